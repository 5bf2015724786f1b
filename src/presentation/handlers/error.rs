use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{ErrorKind, PipelineError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal failures are logged in full and reported generically.
pub fn pipeline_error_response(error: PipelineError) -> Response {
    let status = status_for(error.kind());
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error, "Request failed");
        return error_response(status, "Internal server error");
    }
    tracing::debug!(error = %error, status = %status, "Request rejected");
    error_response(status, error.to_string())
}
