use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::presentation::state::AppState;

use super::error::pipeline_error_response;

#[derive(Debug, Deserialize)]
pub struct UploadUrlRequest {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub file_key: String,
    pub expires_in: u64,
}

#[tracing::instrument(skip(state, request), fields(file_name = %request.file_name))]
pub async fn upload_url_handler(
    State(state): State<AppState>,
    Json(request): Json<UploadUrlRequest>,
) -> impl IntoResponse {
    match state
        .orchestrator
        .request_upload_url(&request.file_name, request.content_type.as_deref())
        .await
    {
        Ok(ticket) => (
            StatusCode::OK,
            Json(UploadUrlResponse {
                upload_url: ticket.upload_url,
                file_key: ticket.file_key.to_string(),
                expires_in: ticket.expires_in.as_secs(),
            }),
        )
            .into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
