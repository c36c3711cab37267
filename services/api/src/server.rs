use crate::cli::ServeArgs;
use crate::infra::{load_config, AppState, InMemoryPreselectionRepository};
use crate::routes::with_admission_routes;
use admission_ranker::error::AppError;
use admission_ranker::telemetry;
use admission_ranker::workflows::admissions::AdmissionService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = load_config(args.policy.as_deref())?;

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
        policy: Arc::new(config.scoring.clone()),
    };

    let repository = Arc::new(InMemoryPreselectionRepository::default());
    let admission_service = Arc::new(AdmissionService::new(repository, config.scoring.clone())?);

    let app = with_admission_routes(admission_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = ?config.scoring_policy,
        "admission ranker ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
