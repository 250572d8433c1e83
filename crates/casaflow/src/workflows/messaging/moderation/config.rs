use serde::{Deserialize, Serialize};

/// Rubric configuration for the automated moderation gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationConfig {
    pub spam_keywords: Vec<String>,
    pub keyword_weight: f32,
    pub shouting_ratio: f32,
    pub shouting_weight: f32,
    pub max_emphatic_marks: usize,
    pub punctuation_weight: f32,
    pub auto_reject_threshold: f32,
    pub min_content_length: usize,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            spam_keywords: default_spam_keywords(),
            keyword_weight: 0.3,
            shouting_ratio: 0.5,
            shouting_weight: 0.3,
            max_emphatic_marks: 5,
            punctuation_weight: 0.2,
            auto_reject_threshold: 0.7,
            min_content_length: 20,
        }
    }
}

fn default_spam_keywords() -> Vec<String> {
    [
        "free money",
        "click here",
        "winner",
        "lottery",
        "casino",
        "guaranteed",
        "make money fast",
        "investment opportunity",
        "no obligation",
        "act now",
        "limited time offer",
        "wire transfer",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
