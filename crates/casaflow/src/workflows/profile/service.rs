use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{
    DocumentId, DocumentKind, DocumentStatus, UserProfile, VerificationDocument, VerificationState,
};
use super::repository::{DocumentRepository, ProfileRepository, RepositoryError};
use super::trust::{TrustBreakdown, TrustWeights};
use crate::workflows::messaging::domain::{Correspondent, UserId};
use crate::workflows::outbound::{
    EmailDispatch, EmailSender, Notification, NotificationKind, Notifier,
};

/// Admin verdict applied to a pending verification document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum DocumentVerdict {
    Approve,
    Reject { reason: String },
}

/// Service maintaining verification flags, document review, and the
/// eagerly persisted trust score.
pub struct VerificationService<P, D, N, E> {
    profiles: Arc<P>,
    documents: Arc<D>,
    notifier: Arc<N>,
    mailer: Arc<E>,
    weights: TrustWeights,
}

static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_document_id() -> DocumentId {
    let id = DOCUMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DocumentId(format!("doc-{id:06}"))
}

impl<P, D, N, E> VerificationService<P, D, N, E>
where
    P: ProfileRepository + 'static,
    D: DocumentRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    pub fn new(
        profiles: Arc<P>,
        documents: Arc<D>,
        notifier: Arc<N>,
        mailer: Arc<E>,
        weights: TrustWeights,
    ) -> Self {
        Self {
            profiles,
            documents,
            notifier,
            mailer,
            weights,
        }
    }

    /// Create the profile for a newly registered account, starting fully
    /// unverified with a zero trust score.
    pub fn register(&self, user: Correspondent) -> Result<UserProfile, VerificationServiceError> {
        let profile = UserProfile::new(user);
        self.profiles.save(profile.clone())?;
        Ok(profile)
    }

    pub fn confirm_email(&self, user_id: &UserId) -> Result<UserProfile, VerificationServiceError> {
        self.set_flag(user_id, |state| state.email_verified = true)
    }

    pub fn confirm_phone(&self, user_id: &UserId) -> Result<UserProfile, VerificationServiceError> {
        self.set_flag(user_id, |state| state.phone_verified = true)
    }

    pub fn accept_terms(&self, user_id: &UserId) -> Result<UserProfile, VerificationServiceError> {
        self.set_flag(user_id, |state| state.terms_accepted = true)
    }

    fn set_flag(
        &self,
        user_id: &UserId,
        apply: impl FnOnce(&mut VerificationState),
    ) -> Result<UserProfile, VerificationServiceError> {
        let mut profile = self
            .profiles
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;
        apply(&mut profile.verification);
        Ok(self.recompute_and_save(profile)?)
    }

    /// Register an uploaded document for review.
    pub fn submit_document(
        &self,
        owner: &UserId,
        kind: DocumentKind,
    ) -> Result<VerificationDocument, VerificationServiceError> {
        self.profiles
            .fetch(owner)?
            .ok_or(RepositoryError::NotFound)?;

        let document = VerificationDocument {
            id: next_document_id(),
            owner: owner.clone(),
            kind,
            status: DocumentStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            review_note: None,
        };

        Ok(self.documents.insert(document)?)
    }

    /// Apply an admin verdict to a pending document.
    ///
    /// Validation failures abort before any persistence or notification.
    /// Approval flips the matching verification flag and eagerly recomputes
    /// the owner's trust score; rejection records the reason. Both paths
    /// notify the owner, and either way the review is terminal.
    pub fn review_document(
        &self,
        id: &DocumentId,
        verdict: DocumentVerdict,
    ) -> Result<VerificationDocument, VerificationServiceError> {
        if let DocumentVerdict::Reject { reason } = &verdict {
            if reason.trim().is_empty() {
                return Err(VerificationServiceError::MissingRejectReason);
            }
        }

        let mut document = self
            .documents
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if document.status.is_reviewed() {
            return Err(VerificationServiceError::AlreadyReviewed {
                status: document.status.label(),
            });
        }

        let mut profile = self
            .profiles
            .fetch(&document.owner)?
            .ok_or(RepositoryError::NotFound)?;

        document.reviewed_at = Some(Utc::now());
        match verdict {
            DocumentVerdict::Approve => {
                document.status = DocumentStatus::Approved;
                match document.kind {
                    DocumentKind::Identity => profile.verification.identity_verified = true,
                    DocumentKind::Financial => profile.verification.financial_verified = true,
                }
            }
            DocumentVerdict::Reject { reason } => {
                document.status = DocumentStatus::Rejected;
                document.review_note = Some(reason);
            }
        }

        self.documents.update(document.clone())?;
        // Rejection changes no flag, but the recompute is idempotent and the
        // trigger is every change to the underlying review state.
        let profile = self.recompute_and_save(profile)?;

        self.dispatch_review(&document, &profile);
        Ok(document)
    }

    /// Pending documents for the review desk.
    pub fn pending_documents(
        &self,
        limit: usize,
    ) -> Result<Vec<VerificationDocument>, VerificationServiceError> {
        Ok(self.documents.pending(limit)?)
    }

    /// Profile view with the per-factor trust audit.
    pub fn trust_report(&self, user_id: &UserId) -> Result<TrustReport, VerificationServiceError> {
        let profile = self
            .profiles
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;

        let breakdown = self.weights.breakdown(&profile.verification);
        Ok(TrustReport {
            user_id: profile.user.user_id,
            display_name: profile.user.display_name,
            trust_score: profile.trust_score,
            trust_updated_at: profile.trust_updated_at,
            breakdown,
        })
    }

    fn recompute_and_save(
        &self,
        mut profile: UserProfile,
    ) -> Result<UserProfile, RepositoryError> {
        profile.trust_score = self.weights.score(&profile.verification);
        profile.trust_updated_at = Some(Utc::now());
        self.profiles.save(profile.clone())?;
        Ok(profile)
    }

    fn dispatch_review(&self, document: &VerificationDocument, profile: &UserProfile) {
        match document.status {
            DocumentStatus::Approved => {
                let notification = Notification::new(
                    document.owner.clone(),
                    NotificationKind::DocumentApproved,
                    "Document approved".to_string(),
                    format!(
                        "Your {} document was approved. Your trust score is now {:.1}.",
                        document.kind.label(),
                        profile.trust_score
                    ),
                )
                .with_data("document_id", document.id.0.clone());

                if let Err(err) = self.notifier.create(notification) {
                    warn!(document = %document.id.0, "failed to notify owner of approval: {err}");
                }

                let mut details = BTreeMap::new();
                details.insert("document_id".to_string(), document.id.0.clone());
                details.insert("kind".to_string(), document.kind.label().to_string());
                details.insert(
                    "trust_score".to_string(),
                    format!("{:.1}", profile.trust_score),
                );

                if let Err(err) = self.mailer.send(EmailDispatch {
                    to: profile.user.email.clone(),
                    template: "document_approved".to_string(),
                    details,
                }) {
                    warn!(document = %document.id.0, "failed to email owner of approval: {err}");
                }
            }
            DocumentStatus::Rejected => {
                let reason = document
                    .review_note
                    .as_deref()
                    .unwrap_or("no reason recorded");
                let notification = Notification::new(
                    document.owner.clone(),
                    NotificationKind::DocumentRejected,
                    "Document rejected".to_string(),
                    format!(
                        "Your {} document was rejected: {reason}",
                        document.kind.label()
                    ),
                )
                .with_data("document_id", document.id.0.clone());

                if let Err(err) = self.notifier.create(notification) {
                    warn!(document = %document.id.0, "failed to notify owner of rejection: {err}");
                }
            }
            DocumentStatus::Pending => {}
        }
    }
}

/// Profile view exposing the derived score and its audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct TrustReport {
    pub user_id: UserId,
    pub display_name: String,
    pub trust_score: f32,
    pub trust_updated_at: Option<DateTime<Utc>>,
    pub breakdown: TrustBreakdown,
}

/// Error raised by the verification service.
#[derive(Debug, thiserror::Error)]
pub enum VerificationServiceError {
    #[error("document rejection requires a reason")]
    MissingRejectReason,
    #[error("document is already {status}, only pending documents can be reviewed")]
    AlreadyReviewed { status: &'static str },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
