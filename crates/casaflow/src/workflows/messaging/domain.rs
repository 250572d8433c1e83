use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Identifier wrapper for platform accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Role attached to an account, used to tell member-to-member traffic apart
/// from mail addressed to the moderation desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountRole {
    Member,
    Staff,
}

/// Snapshot of a message participant captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correspondent {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: AccountRole,
}

/// Inbound payload for a new message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSubmission {
    pub sender: Correspondent,
    pub recipient: Correspondent,
    pub subject: String,
    pub content: String,
    pub in_reply_to: Option<MessageId>,
}

impl MessageSubmission {
    /// A reply inside an existing member-to-member thread skips moderation.
    pub fn is_direct_reply(&self) -> bool {
        self.in_reply_to.is_some() && self.recipient.role == AccountRole::Member
    }

    /// Subject and content concatenated, the text the spam rules score.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.subject, self.content)
    }
}

/// Lifecycle of a message through the moderation gate.
///
/// `Modified` marks an admin edit delivered in place of the original text;
/// the original `content` is preserved and the edit lives in
/// `moderated_content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Pending,
    Approved,
    Rejected,
    Modified,
}

impl MessageStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Approved => "approved",
            MessageStatus::Rejected => "rejected",
            MessageStatus::Modified => "modified",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, MessageStatus::Pending)
    }

    /// Only `Pending` may move, and only forward into a terminal state.
    pub const fn can_transition_to(self, next: MessageStatus) -> bool {
        matches!(self, MessageStatus::Pending) && next.is_terminal()
    }

    /// Delivered messages are the ones a recipient can read.
    pub const fn is_delivered(self) -> bool {
        matches!(self, MessageStatus::Approved | MessageStatus::Modified)
    }
}

/// Stored message entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Correspondent,
    pub recipient: Correspondent,
    pub subject: String,
    pub content: String,
    pub status: MessageStatus,
    pub is_read: bool,
    pub review_note: Option<String>,
    pub moderated_content: Option<String>,
    pub moderated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Body shown to the recipient: the admin edit when one exists.
    pub fn delivered_content(&self) -> &str {
        self.moderated_content.as_deref().unwrap_or(&self.content)
    }
}
