use crate::infra::{AppState, EvaluationState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use broker_ai::error::AppError;
use broker_ai::workflows::leads::{
    lead_router, LeadRepository, LeadStudyService, NotificationPublisher,
};
use broker_ai::workflows::mortgage::{
    evaluate, BorrowerProfile, ClosingCosts, Jurisdiction, LeadFinancialsForm, OperationStatus,
    RateScenario, ScenarioRequest, ViabilityResult,
};
use broker_ai::workflows::scoring::{LeadScore, LeadScoreInput};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    #[serde(flatten)]
    pub(crate) profile: BorrowerProfile,
    #[serde(default)]
    pub(crate) jurisdiction: Option<Jurisdiction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormEvaluateRequest {
    #[serde(flatten)]
    pub(crate) form: LeadFinancialsForm,
    #[serde(default)]
    pub(crate) jurisdiction: Option<Jurisdiction>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateResponse {
    pub(crate) status: OperationStatus,
    pub(crate) summary: String,
    pub(crate) result: ViabilityResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) closing_costs: Option<ClosingCosts>,
}

pub(crate) fn with_lead_routes<R, N>(service: Arc<LeadStudyService<R, N>>) -> Router
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    lead_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(mortgage_routes())
}

pub(crate) fn mortgage_routes() -> Router {
    Router::new()
        .route("/api/v1/mortgage/evaluate", post(evaluate_endpoint))
        .route("/api/v1/mortgage/evaluate/form", post(evaluate_form_endpoint))
        .route("/api/v1/mortgage/scenarios", post(scenarios_endpoint))
        .route("/api/v1/leads/score", post(score_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_endpoint(
    Extension(state): Extension<EvaluationState>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let EvaluateRequest {
        profile,
        jurisdiction,
    } = payload;
    profile.validate()?;
    Ok(Json(study(&state, &profile, jurisdiction)))
}

pub(crate) async fn evaluate_form_endpoint(
    Extension(state): Extension<EvaluationState>,
    Json(payload): Json<FormEvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let profile = payload.form.to_profile();
    profile.validate()?;
    Ok(Json(study(&state, &profile, payload.jurisdiction)))
}

fn study(
    state: &EvaluationState,
    profile: &BorrowerProfile,
    jurisdiction: Option<Jurisdiction>,
) -> EvaluateResponse {
    let result = match jurisdiction {
        Some(jurisdiction) => {
            let config = state
                .evaluator
                .config()
                .clone()
                .with_taxes_and_fees_rate(jurisdiction.taxes_and_fees_rate());
            evaluate(profile, &config)
        }
        None => state.evaluator.evaluate(profile),
    };

    debug!(
        status = result.status().label(),
        dti = result.debt_to_income_percent,
        ltv = result.loan_to_value_requested_percent,
        "stateless viability evaluation"
    );

    EvaluateResponse {
        status: result.status(),
        summary: result.summary(),
        closing_costs: jurisdiction.map(|j| j.closing_costs(profile.property_price)),
        result,
    }
}

pub(crate) async fn scenarios_endpoint(
    Json(request): Json<ScenarioRequest>,
) -> Json<Vec<RateScenario>> {
    Json(request.scenarios())
}

pub(crate) async fn score_endpoint(
    Extension(state): Extension<EvaluationState>,
    Json(input): Json<LeadScoreInput>,
) -> Json<LeadScore> {
    Json(state.scorer.score(&input))
}
