use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::caller::Caller;
use super::dto::MetadataResponse;
use super::error::{error_response, pipeline_error_response};

#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    #[serde(default)]
    pub job_id: Option<String>,
}

#[tracing::instrument(skip(state, caller, request), fields(job_id = ?request.job_id))]
pub async fn metadata_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<MetadataRequest>,
) -> impl IntoResponse {
    let Some(raw_id) = request.job_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "job_id is required");
    };
    let Ok(job_id) = raw_id.parse::<JobId>() else {
        return error_response(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", raw_id));
    };

    match state.orchestrator.generate_metadata(job_id, caller.as_ref()).await {
        Ok(metadata) => (StatusCode::OK, Json(MetadataResponse::from(metadata))).into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
