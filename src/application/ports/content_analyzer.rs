use std::path::Path;

use async_trait::async_trait;

use crate::domain::{VideoAnalysis, VideoMetadata};

/// The transcription, translation and transcreation engine.
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    async fn analyze_video(
        &self,
        video: &Path,
        target_language: &str,
    ) -> Result<VideoAnalysis, AnalyzerError>;

    /// Title, description and tags for publishing a video localized into
    /// `target_language`. Text only; no video is sent.
    async fn generate_metadata(
        &self,
        video_title: &str,
        target_language: &str,
    ) -> Result<VideoMetadata, AnalyzerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("content analyzer is not configured")]
    NotConfigured,
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("video upload failed: {0}")]
    UploadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    /// Rate-limit, quota and overload failures; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalyzerError::RateLimited(_) | AnalyzerError::Unavailable(_))
    }
}
