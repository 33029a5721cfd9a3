use crate::cli::ServeArgs;
use crate::infra::{load_store, AppState};
use crate::routes::with_progress_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use learner_progress::config::AppConfig;
use learner_progress::error::AppError;
use learner_progress::progress::LearnerProgressService;
use learner_progress::telemetry;
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
    if let Some(roster) = args.roster.take() {
        config.data.roster_path = Some(roster);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = load_store(config.data.roster_path.as_deref())?;
    let progress_service = Arc::new(LearnerProgressService::new(Arc::new(store)));

    let app = with_progress_routes(progress_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "learner progress dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
