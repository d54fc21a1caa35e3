use crate::cli::ServeArgs;
use crate::infra::{
    seeded_directory, seeded_scores, AppState, InMemoryReportJobStore,
    LoggingNotificationDispatcher, TextArtifactRenderer,
};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use hirelens::config::AppConfig;
use hirelens::error::AppError;
use hirelens::reports::ReportJobService;
use hirelens::telemetry;
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

    let store = Arc::new(InMemoryReportJobStore::default());
    let report_service = Arc::new(ReportJobService::new(
        store,
        Arc::new(seeded_directory()),
        Arc::new(seeded_scores()),
        Arc::new(TextArtifactRenderer),
        Arc::new(LoggingNotificationDispatcher::default()),
    ));

    let app = with_report_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ranking report service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
