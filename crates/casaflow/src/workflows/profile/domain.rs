use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::messaging::domain::{Correspondent, UserId};

/// Identifier wrapper for verification documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// Independent verification facts tracked per account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    pub email_verified: bool,
    pub phone_verified: bool,
    pub identity_verified: bool,
    pub financial_verified: bool,
    pub terms_accepted: bool,
}

/// Stored profile with the derived trust score.
///
/// `trust_score` is never hand-edited: it is recomputed and persisted on
/// every change to the underlying verification state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: Correspondent,
    pub verification: VerificationState,
    pub trust_score: f32,
    pub trust_updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(user: Correspondent) -> Self {
        Self {
            user,
            verification: VerificationState::default(),
            trust_score: 0.0,
            trust_updated_at: None,
        }
    }
}

/// Category of uploaded proof, mapped to the verification flag it unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Identity,
    Financial,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::Identity => "identity",
            DocumentKind::Financial => "financial",
        }
    }
}

/// Review lifecycle of an uploaded document. Reviewed states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }

    pub const fn is_reviewed(self) -> bool {
        !matches!(self, DocumentStatus::Pending)
    }
}

/// Stored verification document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationDocument {
    pub id: DocumentId,
    pub owner: UserId,
    pub kind: DocumentKind,
    pub status: DocumentStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_note: Option<String>,
}
