use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    delete_job_handler, draft_handler, finalize_handler, health_handler, history_handler,
    job_status_handler, languages_handler, metadata_handler, upload_url_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/video/upload-url", post(upload_url_handler))
        .route("/api/video/draft", post(draft_handler))
        .route("/api/video/job/{job_id}", get(job_status_handler))
        .route("/api/video/finalize", post(finalize_handler))
        .route("/api/video/metadata", post(metadata_handler))
        .route("/api/video/languages", get(languages_handler))
        .route("/api/video/history", get(history_handler))
        .route("/api/video/{job_id}", delete(delete_job_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
