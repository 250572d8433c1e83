use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use casaflow::workflows::messaging::{message_router, MessageRepository, MessagingService};
use casaflow::workflows::outbound::{EmailSender, Notifier};
use casaflow::workflows::profile::{
    profile_router, DocumentRepository, ProfileRepository, VerificationService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_platform_routes<R, P, D, N, E>(
    messaging: Arc<MessagingService<R, N, E>>,
    verification: Arc<VerificationService<P, D, N, E>>,
) -> axum::Router
where
    R: MessageRepository + 'static,
    P: ProfileRepository + 'static,
    D: DocumentRepository + 'static,
    N: Notifier + 'static,
    E: EmailSender + 'static,
{
    message_router(messaging)
        .merge(profile_router(verification))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
