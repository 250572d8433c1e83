use crate::cli::ServeArgs;
use crate::infra::{
    default_moderation_config, default_trust_weights, dispatch_policy, AppState,
    InMemoryDocumentRepository, InMemoryMailer, InMemoryMessageRepository, InMemoryNotifier,
    InMemoryProfileRepository,
};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use casaflow::config::AppConfig;
use casaflow::error::AppError;
use casaflow::telemetry;
use casaflow::workflows::messaging::MessagingService;
use casaflow::workflows::profile::VerificationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let notifier = Arc::new(InMemoryNotifier::default());
    let mailer = Arc::new(InMemoryMailer::default());

    let messaging_service = Arc::new(MessagingService::new(
        Arc::new(InMemoryMessageRepository::default()),
        notifier.clone(),
        mailer.clone(),
        default_moderation_config(),
        dispatch_policy(&config.admin),
    ));
    let verification_service = Arc::new(VerificationService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryDocumentRepository::default()),
        notifier,
        mailer,
        default_trust_weights(),
    ));

    let app = with_platform_routes(messaging_service, verification_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketplace moderation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
