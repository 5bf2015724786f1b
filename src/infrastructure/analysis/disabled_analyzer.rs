use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{AnalyzerError, ContentAnalyzer};
use crate::domain::{VideoAnalysis, VideoMetadata};

pub struct DisabledAnalyzer;

#[async_trait]
impl ContentAnalyzer for DisabledAnalyzer {
    fn is_configured(&self) -> bool {
        false
    }

    async fn analyze_video(&self, _video: &Path, _target_language: &str) -> Result<VideoAnalysis, AnalyzerError> {
        Err(AnalyzerError::NotConfigured)
    }

    async fn generate_metadata(&self, _video_title: &str, _target_language: &str) -> Result<VideoMetadata, AnalyzerError> {
        Err(AnalyzerError::NotConfigured)
    }
}
