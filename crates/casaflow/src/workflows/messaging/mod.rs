//! Member-to-member messaging with an automated moderation gate.
//!
//! Every submission passes through the [`moderation::ModerationEngine`]
//! before it is stored: clean traffic is delivered immediately, spam is
//! rejected outright, and anything suspicious lands in the review desk
//! queue for an admin verdict. Delivery and rejection fan out in-app
//! notifications and templated email through the outbound seam.

pub mod domain;
pub mod moderation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AccountRole, Correspondent, Message, MessageId, MessageStatus, MessageSubmission, UserId,
};
pub use moderation::{
    ApprovalBasis, ContactKind, ModerationConfig, ModerationDecision, ModerationEngine,
    ModerationOutcome, RejectionBasis, ReviewTrigger, SpamFactor, SpamSignal,
};
pub use repository::{MessageRecord, MessageRepository, MessageStatusView, RepositoryError};
pub use router::message_router;
pub use service::{DispatchPolicy, MessagingService, MessagingServiceError, ReviewVerdict};
