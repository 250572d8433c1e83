use serde::{Deserialize, Serialize};

use super::domain::{Message, MessageId};
use super::moderation::ModerationOutcome;

/// Repository record containing the message and its moderation audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message: Message,
    pub moderation: Option<ModerationOutcome>,
}

impl MessageRecord {
    pub fn decision_rationale(&self) -> String {
        if let Some(note) = &self.message.review_note {
            return note.clone();
        }
        match &self.moderation {
            Some(outcome) => outcome.decision.summary(),
            None => "awaiting moderation".to_string(),
        }
    }

    pub fn status_view(&self) -> MessageStatusView {
        MessageStatusView {
            message_id: self.message.id.clone(),
            status: self.message.status.label(),
            decision_rationale: self.decision_rationale(),
            is_read: self.message.is_read,
            spam_score: self.moderation.as_ref().map(|outcome| outcome.spam_score),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait MessageRepository: Send + Sync {
    fn insert(&self, record: MessageRecord) -> Result<MessageRecord, RepositoryError>;
    fn update(&self, record: MessageRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &MessageId) -> Result<Option<MessageRecord>, RepositoryError>;
    fn queue(&self, limit: usize) -> Result<Vec<MessageRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a message's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct MessageStatusView {
    pub message_id: MessageId,
    pub status: &'static str,
    pub decision_rationale: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_score: Option<f32>,
}
