use crate::cli::ServeArgs;
use crate::infra::{load_dataset, AppState, InMemoryAcademicRepository};
use crate::routes::with_academic_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gradebook::academics::{GradeReportService, SystemClock};
use gradebook::config::AppConfig;
use gradebook::error::AppError;
use gradebook::telemetry;
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

    let repository = match &config.records.dataset_path {
        Some(path) => InMemoryAcademicRepository::from_dataset(load_dataset(path)?)?,
        None => InMemoryAcademicRepository::default(),
    };
    let report_service = Arc::new(GradeReportService::new(
        Arc::new(repository),
        Arc::new(SystemClock),
    ));

    let app = with_academic_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "gradebook service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
