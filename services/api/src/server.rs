use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryBuildRepository, InMemoryPlaystyleRepository, LoggingNoticePublisher,
};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use buildmart::config::AppConfig;
use buildmart::error::AppError;
use buildmart::marketplace::MarketplaceService;
use buildmart::telemetry;
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

    let builds = Arc::new(InMemoryBuildRepository::default());
    let profiles = Arc::new(InMemoryPlaystyleRepository::default());
    let notices = Arc::new(LoggingNoticePublisher::default());
    let marketplace = Arc::new(MarketplaceService::new(
        builds,
        profiles,
        notices,
        &config.marketplace,
    ));

    let app = with_marketplace_routes(marketplace)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        require_moderation = config.marketplace.require_moderation,
        "build marketplace ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
