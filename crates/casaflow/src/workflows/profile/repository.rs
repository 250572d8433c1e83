use super::domain::{DocumentId, UserProfile, VerificationDocument};
use crate::workflows::messaging::domain::UserId;

/// Storage abstraction for profiles so the service can be exercised in
/// isolation.
pub trait ProfileRepository: Send + Sync {
    fn fetch(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
    fn save(&self, profile: UserProfile) -> Result<(), RepositoryError>;
}

/// Storage abstraction for verification documents.
pub trait DocumentRepository: Send + Sync {
    fn insert(
        &self,
        document: VerificationDocument,
    ) -> Result<VerificationDocument, RepositoryError>;
    fn update(&self, document: VerificationDocument) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DocumentId) -> Result<Option<VerificationDocument>, RepositoryError>;
    fn pending(&self, limit: usize) -> Result<Vec<VerificationDocument>, RepositoryError>;
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
