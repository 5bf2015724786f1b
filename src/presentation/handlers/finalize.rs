use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::domain::{JobId, JobStatus, Segment};
use crate::presentation::state::AppState;

use super::caller::Caller;
use super::dto::{JobAcceptedResponse, SegmentPayload};
use super::error::{error_response, pipeline_error_response};

#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default, alias = "approved_segments")]
    pub segments: Vec<SegmentPayload>,
}

#[tracing::instrument(skip(state, caller, request), fields(job_id = ?request.job_id, segments = request.segments.len()))]
pub async fn finalize_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<FinalizeRequest>,
) -> impl IntoResponse {
    let Some(raw_id) = request.job_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "job_id is required");
    };
    let Ok(job_id) = raw_id.parse::<JobId>() else {
        return error_response(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", raw_id));
    };

    let segments: Vec<Segment> = request
        .segments
        .into_iter()
        .enumerate()
        .map(|(position, payload)| payload.into_segment(position))
        .collect();

    match state.orchestrator.finalize(job_id, segments, caller).await {
        Ok(handle) => {
            let job_id = handle.detach();
            (
                StatusCode::ACCEPTED,
                Json(JobAcceptedResponse {
                    job_id: job_id.to_string(),
                    status: JobStatus::Pending.to_string(),
                    message: "Finalization started".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => pipeline_error_response(e),
    }
}
