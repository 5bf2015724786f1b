use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::domain::{JobStatus, StorageKey};
use crate::presentation::state::AppState;

use super::caller::Caller;
use super::dto::JobAcceptedResponse;
use super::error::pipeline_error_response;

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub file_key: String,
    pub target_language: String,
}

/// Starts draft generation and returns immediately with the job id.
#[tracing::instrument(skip(state, caller, request), fields(file_key = %request.file_key))]
pub async fn draft_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<DraftRequest>,
) -> impl IntoResponse {
    let input = StorageKey::from_raw(request.file_key.trim());

    match state
        .orchestrator
        .create_draft(input, &request.target_language, caller)
        .await
    {
        Ok(handle) => {
            let job_id = handle.detach();
            (
                StatusCode::ACCEPTED,
                Json(JobAcceptedResponse {
                    job_id: job_id.to_string(),
                    status: JobStatus::Pending.to_string(),
                    message: "Draft generation started".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => pipeline_error_response(e),
    }
}
