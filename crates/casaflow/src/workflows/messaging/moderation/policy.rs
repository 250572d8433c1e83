use serde::{Deserialize, Serialize};

use super::config::ModerationConfig;
use super::rules::{ContactKind, TextSignals};

/// Gate outcome for a submitted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModerationDecision {
    AutoApprove(ApprovalBasis),
    ManualReview(ReviewTrigger),
    AutoReject(RejectionBasis),
}

impl ModerationDecision {
    pub fn summary(&self) -> String {
        match self {
            ModerationDecision::AutoApprove(basis) => basis.summary(),
            ModerationDecision::ManualReview(trigger) => trigger.summary(),
            ModerationDecision::AutoReject(basis) => basis.summary(),
        }
    }
}

/// Why a message cleared the gate without human review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalBasis {
    DirectReply,
    CleanContent,
}

impl ApprovalBasis {
    pub fn summary(&self) -> String {
        match self {
            ApprovalBasis::DirectReply => {
                "direct reply in an existing thread, moderation skipped".to_string()
            }
            ApprovalBasis::CleanContent => "clean message".to_string(),
        }
    }
}

/// Why a message was queued for the review desk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReviewTrigger {
    ContactInformation(ContactKind),
    ContentTooShort { length: usize, minimum: usize },
}

impl ReviewTrigger {
    pub fn summary(&self) -> String {
        match self {
            ReviewTrigger::ContactInformation(kind) => {
                format!("contains contact information ({})", kind.label())
            }
            ReviewTrigger::ContentTooShort { length, minimum } => {
                format!("message too short ({length} of {minimum} required characters)")
            }
        }
    }
}

/// Why a message was rejected outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionBasis {
    SpamScore { score: f32, threshold: f32 },
}

impl RejectionBasis {
    pub fn summary(&self) -> String {
        match self {
            RejectionBasis::SpamScore { score, threshold } => {
                format!("high spam score ({score:.2} over threshold {threshold:.2})")
            }
        }
    }
}

pub(crate) fn decide_outcome(
    direct_reply: bool,
    signals: &TextSignals,
    config: &ModerationConfig,
) -> ModerationDecision {
    if direct_reply {
        return ModerationDecision::AutoApprove(ApprovalBasis::DirectReply);
    }

    if signals.spam_score > config.auto_reject_threshold {
        return ModerationDecision::AutoReject(RejectionBasis::SpamScore {
            score: signals.spam_score,
            threshold: config.auto_reject_threshold,
        });
    }

    if let Some(kind) = signals.contact {
        return ModerationDecision::ManualReview(ReviewTrigger::ContactInformation(kind));
    }

    if signals.content_length < config.min_content_length {
        return ModerationDecision::ManualReview(ReviewTrigger::ContentTooShort {
            length: signals.content_length,
            minimum: config.min_content_length,
        });
    }

    ModerationDecision::AutoApprove(ApprovalBasis::CleanContent)
}
