use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::caller::Caller;
use super::error::{error_response, pipeline_error_response};

/// Removes the caller's history record. Stored media is left in place.
#[tracing::instrument(skip(state, caller))]
pub async fn delete_job_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let Some(user_id) = caller else {
        return error_response(StatusCode::UNAUTHORIZED, "Authentication required");
    };
    let Ok(id) = job_id.parse::<JobId>() else {
        return error_response(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", job_id));
    };

    match state.orchestrator.delete_job(&user_id, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
