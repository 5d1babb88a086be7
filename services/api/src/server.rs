use crate::cli::ServeArgs;
use crate::infra::{sample_applications, AppState};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use staffing_pipeline::config::AppConfig;
use staffing_pipeline::error::AppError;
use staffing_pipeline::workflows::applications::{
    BackendState, InMemoryApplicationStore, StatusMapping,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = if args.empty {
        InMemoryApplicationStore::default()
    } else {
        InMemoryApplicationStore::with_applications(sample_applications())
    };
    let backend_state = Arc::new(BackendState {
        store: Arc::new(store),
        mapping: StatusMapping::fallback(),
    });

    let app = with_application_routes(backend_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "reference staffing backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
