use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::messaging::router::{
    message_router, review_handler, status_handler, submit_handler,
};
use crate::workflows::messaging::service::MessagingService;

fn service_with_memory() -> Arc<MessagingService<MemoryMessages, MemoryNotifier, MemoryMailer>> {
    let (service, _repository, _notifier, _mailer) = build_service();
    Arc::new(service)
}

#[tokio::test]
async fn submit_handler_accepts_clean_message() {
    let service = service_with_memory();

    let response = submit_handler::<MemoryMessages, MemoryNotifier, MemoryMailer>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn submit_handler_reports_duplicates_as_conflict() {
    let service = Arc::new(MessagingService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryNotifier::default()),
        Arc::new(MemoryMailer::default()),
        moderation_config(),
        dispatch_policy(),
    ));

    let response = submit_handler::<ConflictRepository, MemoryNotifier, MemoryMailer>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_reports_storage_outage_as_internal_error() {
    let service = Arc::new(MessagingService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        Arc::new(MemoryMailer::default()),
        moderation_config(),
        dispatch_policy(),
    ));

    let response = submit_handler::<UnavailableRepository, MemoryNotifier, MemoryMailer>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn status_handler_reports_unknown_ids_as_not_found() {
    let service = service_with_memory();

    let response = status_handler::<MemoryMessages, MemoryNotifier, MemoryMailer>(
        State(service),
        Path("msg-999999".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_handler_rejects_blank_reason_as_unprocessable() {
    let (service, _repository, _notifier, _mailer) = build_service();
    let record = service.submit(contact_submission()).expect("submits");
    let service = Arc::new(service);

    let response = review_handler::<MemoryMessages, MemoryNotifier, MemoryMailer>(
        State(service),
        Path(record.message.id.0.clone()),
        axum::Json(reject("")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn review_handler_reports_terminal_state_as_conflict() {
    let (service, _repository, _notifier, _mailer) = build_service();
    let record = service.submit(spam_submission()).expect("spam submits");
    let service = Arc::new(service);

    let response = review_handler::<MemoryMessages, MemoryNotifier, MemoryMailer>(
        State(service),
        Path(record.message.id.0.clone()),
        axum::Json(approve()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn queue_endpoint_lists_pending_messages() {
    let (service, _repository, _notifier, _mailer) = build_service();
    service.submit(submission()).expect("clean submits");
    service.submit(contact_submission()).expect("held submits");

    let router = message_router(Arc::new(service));
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/messages/queue")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let entries = body.as_array().expect("array payload");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "pending");
}
