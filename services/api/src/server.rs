use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryMetricStore, InMemoryUserDirectory};
use crate::routes::with_score_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wipr::config::AppConfig;
use wipr::error::AppError;
use wipr::scoring::{ScoreService, UserDirectory};
use wipr::telemetry;

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

    let store = Arc::new(InMemoryMetricStore::default());
    let directory = Arc::new(InMemoryUserDirectory::default());
    // Seed the demo account the dashboard commits against by default.
    let seeded = directory.create("Ash", "Lead Engineer")?;
    let service = Arc::new(ScoreService::new(store, directory));

    let app = with_score_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, seeded_user = %seeded.name, "score control room ready");

    axum::serve(listener, app).await?;
    Ok(())
}
