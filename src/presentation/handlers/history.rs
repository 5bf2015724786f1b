use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::services::{HistoryEntry, HistoryStats};
use crate::domain::{CulturalNote, Segment};
use crate::presentation::state::AppState;

use super::caller::Caller;
use super::error::{error_response, pipeline_error_response};

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub job_id: String,
    pub status: String,
    pub target_language: String,
    pub input_key: String,
    pub output_key: Option<String>,
    pub compact_key: Option<String>,
    pub subtitle_key: Option<String>,
    pub input_url: Option<String>,
    pub output_url: Option<String>,
    pub compact_url: Option<String>,
    pub subtitle_url: Option<String>,
    pub words_localized: Option<u64>,
    pub size_mb: Option<f64>,
    pub error: Option<String>,
    pub segments_count: usize,
    pub segments: Vec<Segment>,
    pub cultural_report: Vec<CulturalNote>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<HistoryEntry> for HistoryItem {
    fn from(entry: HistoryEntry) -> Self {
        let record = entry.record;
        Self {
            job_id: record.job_id.to_string(),
            status: record.status.to_string(),
            segments_count: record.segments_count(),
            target_language: record.target_language,
            input_key: record.input_key.to_string(),
            output_key: record.output_key.as_ref().map(ToString::to_string),
            compact_key: record.compact_key.as_ref().map(ToString::to_string),
            subtitle_key: record.subtitle_key.as_ref().map(ToString::to_string),
            input_url: entry.input_url,
            output_url: entry.output_url,
            compact_url: entry.compact_url,
            subtitle_url: entry.subtitle_url,
            words_localized: record.words_localized,
            size_mb: record.size_mb,
            error: record.error,
            segments: record.segments,
            cultural_report: record.cultural_report,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryStatsResponse {
    pub total_projects: usize,
    pub languages_used: usize,
    pub words_localized: u64,
}

impl From<HistoryStats> for HistoryStatsResponse {
    fn from(stats: HistoryStats) -> Self {
        Self {
            total_projects: stats.total_projects,
            languages_used: stats.languages_used,
            words_localized: stats.words_localized,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryItem>,
    pub stats: HistoryStatsResponse,
}

pub async fn history_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let Some(user_id) = caller else {
        return error_response(StatusCode::UNAUTHORIZED, "Authentication required");
    };

    match state.orchestrator.get_history(&user_id, query.limit).await {
        Ok(page) => (
            StatusCode::OK,
            Json(HistoryResponse {
                history: page.entries.into_iter().map(HistoryItem::from).collect(),
                stats: page.stats.into(),
            }),
        )
            .into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
