use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::ModerationConfig;

/// Discrete contribution to the spam score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamSignal {
    pub factor: SpamFactor,
    pub weight: f32,
    pub notes: String,
}

/// Factors the spam rubric may charge against a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpamFactor {
    KeywordMatch,
    UppercaseShouting,
    ExcessEmphasis,
}

/// Category of contact information detected in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    EmailAddress,
    PhoneNumber,
    Url,
}

impl ContactKind {
    pub const fn label(self) -> &'static str {
        match self {
            ContactKind::EmailAddress => "email address",
            ContactKind::PhoneNumber => "phone number",
            ContactKind::Url => "url",
        }
    }
}

pub(crate) struct TextSignals {
    pub spam_score: f32,
    pub contact: Option<ContactKind>,
    pub content_length: usize,
}

/// Score the concatenated subject + content against the spam rubric.
///
/// Each configured keyword is charged at most once regardless of how often
/// it occurs. The returned score is clamped to [0.0, 1.0].
pub(crate) fn score_text(full_text: &str, config: &ModerationConfig) -> (Vec<SpamSignal>, f32) {
    let mut signals = Vec::new();
    let mut score: f32 = 0.0;

    let lowered = full_text.to_lowercase();
    for keyword in &config.spam_keywords {
        if lowered.contains(&keyword.to_lowercase()) {
            signals.push(SpamSignal {
                factor: SpamFactor::KeywordMatch,
                weight: config.keyword_weight,
                notes: format!("matched spam keyword '{keyword}'"),
            });
            score += config.keyword_weight;
        }
    }

    let letters = full_text.chars().filter(|ch| ch.is_alphabetic()).count();
    if letters > 0 {
        let uppercase = full_text.chars().filter(|ch| ch.is_uppercase()).count();
        let ratio = uppercase as f32 / letters as f32;
        if ratio > config.shouting_ratio {
            signals.push(SpamSignal {
                factor: SpamFactor::UppercaseShouting,
                weight: config.shouting_weight,
                notes: format!(
                    "uppercase ratio {:.2} exceeds {:.2}",
                    ratio, config.shouting_ratio
                ),
            });
            score += config.shouting_weight;
        }
    }

    let emphatic = full_text
        .chars()
        .filter(|ch| matches!(ch, '!' | '?'))
        .count();
    if emphatic > config.max_emphatic_marks {
        signals.push(SpamSignal {
            factor: SpamFactor::ExcessEmphasis,
            weight: config.punctuation_weight,
            notes: format!(
                "{emphatic} emphatic marks exceed {}",
                config.max_emphatic_marks
            ),
        });
        score += config.punctuation_weight;
    }

    (signals, score.clamp(0.0, 1.0))
}

/// Compiled detectors for contact information members try to smuggle past
/// the desk: email addresses, phone numbers, bare links.
pub(crate) struct ContactPatterns {
    email: Regex,
    phones: Vec<Regex>,
    url: Regex,
}

impl ContactPatterns {
    pub(crate) fn new() -> Self {
        Self {
            email: Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap(),
            phones: vec![
                // International form with separators, e.g. +33 6 12 34 56 78.
                Regex::new(r"\+\d[\d\s().-]{6,}\d").unwrap(),
                // Local form, e.g. 515-555-0123 or 515 555 0123.
                Regex::new(r"\b\d{3}[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap(),
                // Bare digit run long enough to be a dialable number.
                Regex::new(r"\d{10,}").unwrap(),
            ],
            url: Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap(),
        }
    }

    pub(crate) fn detect(&self, text: &str) -> Option<ContactKind> {
        if self.email.is_match(text) {
            return Some(ContactKind::EmailAddress);
        }
        if self.phones.iter().any(|pattern| pattern.is_match(text)) {
            return Some(ContactKind::PhoneNumber);
        }
        if self.url.is_match(text) {
            return Some(ContactKind::Url);
        }
        None
    }
}
