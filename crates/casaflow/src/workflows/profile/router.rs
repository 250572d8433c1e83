use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::DocumentId;
use super::repository::{DocumentRepository, ProfileRepository, RepositoryError};
use super::service::{DocumentVerdict, VerificationService, VerificationServiceError};
use crate::workflows::messaging::domain::UserId;
use crate::workflows::outbound::{EmailSender, Notifier};

/// Router builder exposing HTTP endpoints for trust lookups and
/// verification flows.
pub fn profile_router<P, D, N, E>(service: Arc<VerificationService<P, D, N, E>>) -> Router
where
    P: ProfileRepository + 'static,
    D: DocumentRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/trust",
            get(trust_handler::<P, D, N, E>),
        )
        .route(
            "/api/v1/users/:user_id/email/confirm",
            post(confirm_email_handler::<P, D, N, E>),
        )
        .route(
            "/api/v1/documents/:document_id/review",
            post(review_document_handler::<P, D, N, E>),
        )
        .with_state(service)
}

pub(crate) async fn trust_handler<P, D, N, E>(
    State(service): State<Arc<VerificationService<P, D, N, E>>>,
    Path(user_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    D: DocumentRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    let id = UserId(user_id);
    match service.trust_report(&id) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(VerificationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "profile not found",
                "user_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn confirm_email_handler<P, D, N, E>(
    State(service): State<Arc<VerificationService<P, D, N, E>>>,
    Path(user_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    D: DocumentRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    let id = UserId(user_id);
    match service.confirm_email(&id) {
        Ok(profile) => {
            let payload = json!({
                "user_id": profile.user.user_id.0,
                "email_verified": profile.verification.email_verified,
                "trust_score": profile.trust_score,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(VerificationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "profile not found",
                "user_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn review_document_handler<P, D, N, E>(
    State(service): State<Arc<VerificationService<P, D, N, E>>>,
    Path(document_id): Path<String>,
    axum::Json(verdict): axum::Json<DocumentVerdict>,
) -> Response
where
    P: ProfileRepository + 'static,
    D: DocumentRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    let id = DocumentId(document_id);
    match service.review_document(&id, verdict) {
        Ok(document) => {
            let payload = json!({
                "document_id": document.id.0,
                "status": document.status.label(),
                "review_note": document.review_note,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error @ VerificationServiceError::MissingRejectReason) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ VerificationServiceError::AlreadyReviewed { .. }) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(VerificationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "document not found",
                "document_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
