use serde::{Deserialize, Serialize};

use super::domain::VerificationState;

/// Weight each verification fact contributes to the 0.0–5.0 trust score.
///
/// The defaults deliberately skew toward the expensive checks: a confirmed
/// email says little, reviewed identity and financial documents say a lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustWeights {
    pub email: f32,
    pub phone: f32,
    pub identity: f32,
    pub financial: f32,
    pub terms: f32,
}

impl Default for TrustWeights {
    fn default() -> Self {
        Self {
            email: 0.5,
            phone: 1.0,
            identity: 1.5,
            financial: 1.5,
            terms: 0.5,
        }
    }
}

impl TrustWeights {
    pub fn maximum(&self) -> f32 {
        self.email + self.phone + self.identity + self.financial + self.terms
    }

    /// Deterministic weighted sum over the verification facts.
    pub fn score(&self, state: &VerificationState) -> f32 {
        self.breakdown(state).total
    }

    /// Per-factor audit of the score.
    pub fn breakdown(&self, state: &VerificationState) -> TrustBreakdown {
        let components = vec![
            TrustComponent::new(TrustFactor::EmailVerified, state.email_verified, self.email),
            TrustComponent::new(TrustFactor::PhoneVerified, state.phone_verified, self.phone),
            TrustComponent::new(
                TrustFactor::IdentityVerified,
                state.identity_verified,
                self.identity,
            ),
            TrustComponent::new(
                TrustFactor::FinancialVerified,
                state.financial_verified,
                self.financial,
            ),
            TrustComponent::new(TrustFactor::TermsAccepted, state.terms_accepted, self.terms),
        ];

        let total = components.iter().map(|component| component.earned).sum();
        TrustBreakdown { total, components }
    }
}

/// Facts permitted in the trust rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustFactor {
    EmailVerified,
    PhoneVerified,
    IdentityVerified,
    FinancialVerified,
    TermsAccepted,
}

/// Discrete contribution to the trust score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustComponent {
    pub factor: TrustFactor,
    pub earned: f32,
    pub available: f32,
}

impl TrustComponent {
    fn new(factor: TrustFactor, satisfied: bool, available: f32) -> Self {
        Self {
            factor,
            earned: if satisfied { available } else { 0.0 },
            available,
        }
    }
}

/// Trust output describing the composite score and its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustBreakdown {
    pub total: f32,
    pub components: Vec<TrustComponent>,
}
