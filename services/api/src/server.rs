use crate::cli::ServeArgs;
use crate::infra::{
    AppState, EvaluationState, InMemoryLeadRepository, InMemoryNotificationPublisher,
};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use broker_ai::config::AppConfig;
use broker_ai::error::AppError;
use broker_ai::telemetry;
use broker_ai::workflows::leads::LeadStudyService;
use broker_ai::workflows::mortgage::ViabilityEvaluator;
use broker_ai::workflows::scoring::LeadScorer;
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
    let evaluation_state = EvaluationState {
        evaluator: Arc::new(ViabilityEvaluator::new(config.viability.clone())),
        scorer: Arc::new(LeadScorer::default()),
    };

    let repository = Arc::new(InMemoryLeadRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let lead_service = Arc::new(LeadStudyService::new(
        repository,
        notifications,
        config.viability.clone(),
    ));

    let app = with_lead_routes(lead_service)
        .layer(Extension(evaluation_state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_dti = config.viability.max_viable_dti,
        taxes_and_fees = config.viability.taxes_and_fees_rate,
        "mortgage broker service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
