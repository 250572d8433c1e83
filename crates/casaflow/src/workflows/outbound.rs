//! Outbound dispatch seam shared by the messaging and profile workflows.
//!
//! Notification storage and email transport live behind these traits so the
//! services can be exercised with in-memory doubles. Dispatch is
//! fire-and-continue: a failed delivery is logged by the caller and never
//! rolls back the workflow decision that triggered it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::messaging::domain::UserId;

/// Closed set of notification types surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    MessageReceived,
    MessageRejected,
    ModerationRequested,
    DocumentApproved,
    DocumentRejected,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::MessageReceived => "message_received",
            NotificationKind::MessageRejected => "message_rejected",
            NotificationKind::ModerationRequested => "moderation_requested",
            NotificationKind::DocumentApproved => "document_approved",
            NotificationKind::DocumentRejected => "document_rejected",
        }
    }
}

/// In-app notification delivered to a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: UserId, kind: NotificationKind, title: String, body: String) -> Self {
        Self {
            user_id,
            kind,
            title,
            body,
            data: BTreeMap::new(),
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// Trait describing the notification store consumed by the workflows.
pub trait Notifier: Send + Sync {
    fn create(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Notification creation error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification store unavailable: {0}")]
    Transport(String),
}

/// Templated email payload handed to the mail adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDispatch {
    pub to: String,
    pub template: String,
    pub details: BTreeMap<String, String>,
}

/// Trait describing the outbound mail adapter.
pub trait EmailSender: Send + Sync {
    fn send(&self, email: EmailDispatch) -> Result<(), EmailError>;
}

/// Email dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}
