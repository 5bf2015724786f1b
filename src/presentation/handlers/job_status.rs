use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::caller::Caller;
use super::dto::JobStatusResponse;
use super::error::{error_response, pipeline_error_response};

#[tracing::instrument(skip(state, caller))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = job_id.parse::<JobId>() else {
        return error_response(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", job_id));
    };

    match state.orchestrator.poll_status(id, caller.as_ref()).await {
        Ok(job) => (StatusCode::OK, Json(JobStatusResponse::from(&job))).into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
