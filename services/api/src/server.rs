use crate::cli::ServeArgs;
use crate::infra::{seed_marketplace, AppState};
use crate::routes::{with_service_routes, Marketplace};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use workbridge::config::AppConfig;
use workbridge::error::AppError;
use workbridge::telemetry;

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

    let marketplace = Marketplace::in_memory();
    if args.seed {
        seed_marketplace(
            &marketplace.jobs,
            &marketplace.companies,
            Local::now().date_naive(),
        );
        info!("demo listings loaded into the in-memory store");
    }

    let app = with_service_routes(&marketplace)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "workbridge marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
