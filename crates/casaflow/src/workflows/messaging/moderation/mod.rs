mod config;
mod policy;
mod rules;

pub use config::ModerationConfig;
pub use policy::{ApprovalBasis, ModerationDecision, RejectionBasis, ReviewTrigger};
pub use rules::{ContactKind, SpamFactor, SpamSignal};

use super::domain::MessageSubmission;
use policy::decide_outcome;
use rules::{ContactPatterns, TextSignals};
use serde::{Deserialize, Serialize};

/// Stateless gate that applies the moderation rubric to a submission.
///
/// Classification is a pure function of the submission: the same sender,
/// recipient, subject, and content always produce the same outcome.
pub struct ModerationEngine {
    config: ModerationConfig,
    patterns: ContactPatterns,
}

impl ModerationEngine {
    pub fn new(config: ModerationConfig) -> Self {
        Self {
            config,
            patterns: ContactPatterns::new(),
        }
    }

    pub fn classify(&self, submission: &MessageSubmission) -> ModerationOutcome {
        let full_text = submission.full_text();
        let (signals, spam_score) = rules::score_text(&full_text, &self.config);

        let text_signals = TextSignals {
            spam_score,
            contact: self.patterns.detect(&full_text),
            content_length: submission.content.chars().count(),
        };

        let decision = decide_outcome(submission.is_direct_reply(), &text_signals, &self.config);

        ModerationOutcome {
            decision,
            spam_score,
            signals,
        }
    }
}

/// Gate output describing the decision and its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationOutcome {
    pub decision: ModerationDecision,
    pub spam_score: f32,
    pub signals: Vec<SpamSignal>,
}
