use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CapabilitiesResponse {
    pub storage: bool,
    pub analyzer: bool,
    pub speech: bool,
    pub history: bool,
    pub media: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub media_version: Option<String>,
    pub capabilities: CapabilitiesResponse,
}

/// Always 200; unconfigured capabilities are reported, not failed.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let capabilities = state.orchestrator.capabilities();
    let media_version = state.orchestrator.media_version().await;

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            media_version,
            capabilities: CapabilitiesResponse {
                storage: capabilities.storage,
                analyzer: capabilities.analyzer,
                speech: capabilities.speech,
                history: capabilities.history,
                media: capabilities.media,
            },
        }),
    )
}
