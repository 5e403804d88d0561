use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeadId, LeadSubmission};
use super::repository::{LeadRepository, NotificationPublisher, RepositoryError};
use super::service::{LeadServiceError, LeadStudyService};
use crate::workflows::mortgage::LeadFinancialsForm;

/// Maximum number of leads returned by the pipeline listing.
pub const LIST_LIMIT: usize = 200;

/// HTTP endpoints for lead intake, studies and history.
pub fn lead_router<R, N>(service: Arc<LeadStudyService<R, N>>) -> Router
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/leads",
            post(create_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route(
            "/api/v1/leads/:lead_id",
            get(status_handler::<R, N>).delete(delete_handler::<R, N>),
        )
        .route(
            "/api/v1/leads/:lead_id/financials",
            put(financials_handler::<R, N>),
        )
        .route("/api/v1/leads/:lead_id/study", post(study_handler::<R, N>))
        .route(
            "/api/v1/leads/:lead_id/history",
            get(history_handler::<R, N>).post(note_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteRequest {
    #[serde(default)]
    pub(crate) author: Option<String>,
    pub(crate) text: String,
}

pub(crate) async fn create_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.create(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.list(LIST_LIMIT) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&LeadId(lead_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn financials_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
    Path(lead_id): Path<String>,
    axum::Json(form): axum::Json<LeadFinancialsForm>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.update_financials(&LeadId(lead_id), &form) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn study_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.run_study(&LeadId(lead_id)) {
        Ok(study) => (StatusCode::OK, axum::Json(study)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.delete(&LeadId(lead_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.history(&LeadId(lead_id)) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn note_handler<R, N>(
    State(service): State<Arc<LeadStudyService<R, N>>>,
    Path(lead_id): Path<String>,
    axum::Json(note): axum::Json<NoteRequest>,
) -> Response
where
    R: LeadRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let author = note.author.unwrap_or_else(|| "broker".to_string());
    match service.add_note(&LeadId(lead_id), &author, &note.text) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LeadServiceError) -> Response {
    let status = match &error {
        LeadServiceError::Profile(_) | LeadServiceError::EmptyNote => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LeadServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LeadServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        LeadServiceError::Repository(RepositoryError::Unavailable(_))
        | LeadServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
