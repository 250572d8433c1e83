use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{MessageId, MessageSubmission};
use super::repository::{MessageRepository, RepositoryError};
use super::service::{MessagingService, MessagingServiceError, ReviewVerdict};
use crate::workflows::outbound::{EmailSender, Notifier};

/// Router builder exposing HTTP endpoints for submission, review, and
/// status lookups.
pub fn message_router<R, N, E>(service: Arc<MessagingService<R, N, E>>) -> Router
where
    R: MessageRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    Router::new()
        .route("/api/v1/messages", post(submit_handler::<R, N, E>))
        .route("/api/v1/messages/queue", get(queue_handler::<R, N, E>))
        .route(
            "/api/v1/messages/:message_id",
            get(status_handler::<R, N, E>),
        )
        .route(
            "/api/v1/messages/:message_id/review",
            post(review_handler::<R, N, E>),
        )
        .route(
            "/api/v1/messages/:message_id/read",
            post(mark_read_handler::<R, N, E>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueueParams {
    #[serde(default = "default_queue_limit")]
    limit: usize,
}

fn default_queue_limit() -> usize {
    50
}

pub(crate) async fn submit_handler<R, N, E>(
    State(service): State<Arc<MessagingService<R, N, E>>>,
    axum::Json(submission): axum::Json<MessageSubmission>,
) -> Response
where
    R: MessageRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(MessagingServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "message already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, N, E>(
    State(service): State<Arc<MessagingService<R, N, E>>>,
    Path(message_id): Path<String>,
) -> Response
where
    R: MessageRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    let id = MessageId(message_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(MessagingServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "message not found",
                "message_id": id.0,
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

pub(crate) async fn review_handler<R, N, E>(
    State(service): State<Arc<MessagingService<R, N, E>>>,
    Path(message_id): Path<String>,
    axum::Json(verdict): axum::Json<ReviewVerdict>,
) -> Response
where
    R: MessageRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    let id = MessageId(message_id);
    match service.review(&id, verdict) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(
            error @ (MessagingServiceError::MissingRejectReason
            | MessagingServiceError::EmptyAmendment),
        ) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ MessagingServiceError::AlreadyFinal { .. }) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(MessagingServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "message not found",
                "message_id": id.0,
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

pub(crate) async fn mark_read_handler<R, N, E>(
    State(service): State<Arc<MessagingService<R, N, E>>>,
    Path(message_id): Path<String>,
) -> Response
where
    R: MessageRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    let id = MessageId(message_id);
    match service.mark_read(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error @ MessagingServiceError::NotDelivered { .. }) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(MessagingServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "message not found",
                "message_id": id.0,
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

pub(crate) async fn queue_handler<R, N, E>(
    State(service): State<Arc<MessagingService<R, N, E>>>,
    Query(params): Query<QueueParams>,
) -> Response
where
    R: MessageRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    match service.queue(params.limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(MessageRecordView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

/// Queue entry exposing enough context for the review desk UI.
#[derive(Debug, serde::Serialize)]
pub(crate) struct MessageRecordView {
    message_id: String,
    sender: String,
    recipient: String,
    subject: String,
    status: &'static str,
    decision_rationale: String,
}

impl From<&super::repository::MessageRecord> for MessageRecordView {
    fn from(record: &super::repository::MessageRecord) -> Self {
        Self {
            message_id: record.message.id.0.clone(),
            sender: record.message.sender.display_name.clone(),
            recipient: record.message.recipient.display_name.clone(),
            subject: record.message.subject.clone(),
            status: record.message.status.label(),
            decision_rationale: record.decision_rationale(),
        }
    }
}
