use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{Correspondent, Message, MessageId, MessageStatus, MessageSubmission};
use super::moderation::{ModerationConfig, ModerationDecision, ModerationEngine};
use super::repository::{MessageRecord, MessageRepository, RepositoryError};
use crate::workflows::outbound::{
    EmailDispatch, EmailSender, Notification, NotificationKind, Notifier,
};

/// Delivery roster for moderation escalations: every admin gets an in-app
/// notification, the primary admin additionally gets an email.
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    pub admins: Vec<Correspondent>,
    pub primary_admin_email: String,
}

/// Admin verdict applied to a pending message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ReviewVerdict {
    Approve,
    Reject { reason: String },
    Amend { content: String },
}

impl ReviewVerdict {
    fn target_status(&self) -> MessageStatus {
        match self {
            ReviewVerdict::Approve => MessageStatus::Approved,
            ReviewVerdict::Reject { .. } => MessageStatus::Rejected,
            ReviewVerdict::Amend { .. } => MessageStatus::Modified,
        }
    }
}

/// Service composing the moderation gate, message store, and outbound
/// dispatch.
pub struct MessagingService<R, N, E> {
    repository: Arc<R>,
    notifier: Arc<N>,
    mailer: Arc<E>,
    engine: Arc<ModerationEngine>,
    dispatch: DispatchPolicy,
}

static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_message_id() -> MessageId {
    let id = MESSAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MessageId(format!("msg-{id:06}"))
}

impl<R, N, E> MessagingService<R, N, E>
where
    R: MessageRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        mailer: Arc<E>,
        config: ModerationConfig,
        dispatch: DispatchPolicy,
    ) -> Self {
        Self {
            repository,
            notifier,
            mailer,
            engine: Arc::new(ModerationEngine::new(config)),
            dispatch,
        }
    }

    /// Submit a new message: classify, persist with the decided status,
    /// then fan out notifications for the resulting state.
    pub fn submit(
        &self,
        submission: MessageSubmission,
    ) -> Result<MessageRecord, MessagingServiceError> {
        let outcome = self.engine.classify(&submission);

        let status = match outcome.decision {
            ModerationDecision::AutoApprove(_) => MessageStatus::Approved,
            ModerationDecision::ManualReview(_) => MessageStatus::Pending,
            ModerationDecision::AutoReject(_) => MessageStatus::Rejected,
        };

        let now = Utc::now();
        let MessageSubmission {
            sender,
            recipient,
            subject,
            content,
            in_reply_to: _,
        } = submission;

        let message = Message {
            id: next_message_id(),
            sender,
            recipient,
            subject,
            content,
            status,
            is_read: false,
            review_note: None,
            moderated_content: None,
            moderated_at: status.is_terminal().then_some(now),
            created_at: now,
        };

        let stored = self.repository.insert(MessageRecord {
            message,
            moderation: Some(outcome),
        })?;

        self.dispatch_transition(&stored);
        Ok(stored)
    }

    /// Apply an admin verdict to a pending message.
    ///
    /// Validation failures abort before any persistence or notification;
    /// terminal messages never move again.
    pub fn review(
        &self,
        id: &MessageId,
        verdict: ReviewVerdict,
    ) -> Result<MessageRecord, MessagingServiceError> {
        match &verdict {
            ReviewVerdict::Reject { reason } if reason.trim().is_empty() => {
                return Err(MessagingServiceError::MissingRejectReason);
            }
            ReviewVerdict::Amend { content } if content.trim().is_empty() => {
                return Err(MessagingServiceError::EmptyAmendment);
            }
            _ => {}
        }

        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let requested = verdict.target_status();
        if !record.message.status.can_transition_to(requested) {
            return Err(MessagingServiceError::AlreadyFinal {
                status: record.message.status.label(),
                requested: requested.label(),
            });
        }

        record.message.status = requested;
        record.message.moderated_at = Some(Utc::now());
        match verdict {
            ReviewVerdict::Approve => {}
            ReviewVerdict::Reject { reason } => record.message.review_note = Some(reason),
            ReviewVerdict::Amend { content } => record.message.moderated_content = Some(content),
        }

        self.repository.update(record.clone())?;
        self.dispatch_transition(&record);
        Ok(record)
    }

    /// Mark a delivered message as read by its recipient.
    pub fn mark_read(&self, id: &MessageId) -> Result<MessageRecord, MessagingServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if !record.message.status.is_delivered() {
            return Err(MessagingServiceError::NotDelivered {
                status: record.message.status.label(),
            });
        }

        record.message.is_read = true;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Pending messages for the review desk.
    pub fn queue(&self, limit: usize) -> Result<Vec<MessageRecord>, MessagingServiceError> {
        Ok(self.repository.queue(limit)?)
    }

    /// Fetch a message and current status for API responses.
    pub fn get(&self, id: &MessageId) -> Result<MessageRecord, MessagingServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Fan out notifications and email for the state the record just
    /// entered. Failures are logged per recipient and never bubble up: the
    /// persisted decision stays authoritative.
    fn dispatch_transition(&self, record: &MessageRecord) {
        match record.message.status {
            MessageStatus::Pending => self.dispatch_pending(record),
            MessageStatus::Approved | MessageStatus::Modified => self.dispatch_delivered(record),
            MessageStatus::Rejected => self.dispatch_rejected(record),
        }
    }

    fn dispatch_pending(&self, record: &MessageRecord) {
        let message = &record.message;
        let rationale = record.decision_rationale();

        for admin in &self.dispatch.admins {
            let notification = Notification::new(
                admin.user_id.clone(),
                NotificationKind::ModerationRequested,
                "Message awaiting review".to_string(),
                format!(
                    "Message from {} to {} was held: {rationale}",
                    message.sender.display_name, message.recipient.display_name
                ),
            )
            .with_data("message_id", message.id.0.clone());

            if let Err(err) = self.notifier.create(notification) {
                warn!(
                    admin = %admin.user_id.0,
                    message = %message.id.0,
                    "failed to notify admin of pending message: {err}"
                );
            }
        }

        let mut details = BTreeMap::new();
        details.insert("message_id".to_string(), message.id.0.clone());
        details.insert("sender".to_string(), message.sender.display_name.clone());
        details.insert("subject".to_string(), message.subject.clone());
        details.insert("reason".to_string(), rationale);

        if let Err(err) = self.mailer.send(EmailDispatch {
            to: self.dispatch.primary_admin_email.clone(),
            template: "message_review_requested".to_string(),
            details,
        }) {
            warn!(message = %message.id.0, "failed to email moderation desk: {err}");
        }
    }

    fn dispatch_delivered(&self, record: &MessageRecord) {
        let message = &record.message;

        let notification = Notification::new(
            message.recipient.user_id.clone(),
            NotificationKind::MessageReceived,
            "New message".to_string(),
            format!(
                "{} sent you a message: {}",
                message.sender.display_name, message.subject
            ),
        )
        .with_data("message_id", message.id.0.clone());

        if let Err(err) = self.notifier.create(notification) {
            warn!(message = %message.id.0, "failed to notify recipient: {err}");
        }

        let mut details = BTreeMap::new();
        details.insert("message_id".to_string(), message.id.0.clone());
        details.insert("sender".to_string(), message.sender.display_name.clone());
        details.insert("subject".to_string(), message.subject.clone());
        details.insert("body".to_string(), message.delivered_content().to_string());

        if let Err(err) = self.mailer.send(EmailDispatch {
            to: message.recipient.email.clone(),
            template: "message_received".to_string(),
            details,
        }) {
            warn!(message = %message.id.0, "failed to email recipient: {err}");
        }
    }

    fn dispatch_rejected(&self, record: &MessageRecord) {
        let message = &record.message;

        let notification = Notification::new(
            message.sender.user_id.clone(),
            NotificationKind::MessageRejected,
            "Message not delivered".to_string(),
            format!(
                "Your message to {} was rejected: {}",
                message.recipient.display_name,
                record.decision_rationale()
            ),
        )
        .with_data("message_id", message.id.0.clone());

        if let Err(err) = self.notifier.create(notification) {
            warn!(message = %message.id.0, "failed to notify sender of rejection: {err}");
        }
    }
}

/// Error raised by the messaging service.
#[derive(Debug, thiserror::Error)]
pub enum MessagingServiceError {
    #[error("rejection verdict requires a reason")]
    MissingRejectReason,
    #[error("amended content must not be empty")]
    EmptyAmendment,
    #[error("message is already {status} and cannot become {requested}")]
    AlreadyFinal {
        status: &'static str,
        requested: &'static str,
    },
    #[error("message is {status}, only delivered messages can be marked read")]
    NotDelivered { status: &'static str },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
