use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::app_routes;
use afterly::config::AppConfig;
use afterly::error::AppError;
use afterly::telemetry;
use afterly::workflows::assessment::AssessmentCatalog;
use afterly::workflows::waitlist::{RegistrarError, WaitlistRegistrar};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let registrar = Arc::new(WaitlistRegistrar::from_config(&config.waitlist)?);
    let starting_position = registrar
        .current_position()
        .map_err(RegistrarError::from)?;

    let app = app_routes(AssessmentCatalog::standard(), registrar)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        waitlist_count = starting_position,
        collector = config.waitlist.collector_url.is_some(),
        email_relay = config.waitlist.email_relay_url.is_some(),
        "afterly service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
