//! Profile verification and the derived trust score.
//!
//! Verification facts flip one at a time (email confirmation, phone
//! confirmation, terms acceptance, document review) and every change
//! recomputes and persists the owner's trust score eagerly so listings and
//! search can sort on it without recomputation.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod trust;

#[cfg(test)]
mod tests;

pub use domain::{
    DocumentId, DocumentKind, DocumentStatus, UserProfile, VerificationDocument, VerificationState,
};
pub use repository::{DocumentRepository, ProfileRepository, RepositoryError};
pub use router::profile_router;
pub use service::{
    DocumentVerdict, TrustReport, VerificationService, VerificationServiceError,
};
pub use trust::{TrustBreakdown, TrustComponent, TrustFactor, TrustWeights};
