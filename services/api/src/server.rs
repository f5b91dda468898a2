use crate::cli::ServeArgs;
use crate::infra::{load_catalog, load_roster, AppState};
use crate::routes::with_consortium_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use consortium_eval::config::AppConfig;
use consortium_eval::error::AppError;
use consortium_eval::telemetry;
use consortium_eval::workflows::consortium::ConsortiumEvaluator;
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
    if let Some(rules) = args.rules.take() {
        config.data.rules_path = Some(rules);
    }
    if let Some(roster) = args.roster.take() {
        config.data.roster_path = Some(roster);
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let catalog = Arc::new(load_catalog(config.data.rules_path.as_deref())?);
    let roster = load_roster(config.data.roster_path.as_deref())?.map(Arc::new);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: catalog.clone(),
        roster,
    };

    let evaluator = Arc::new(ConsortiumEvaluator::new(catalog));
    let app = with_consortium_routes(evaluator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "consortium evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
