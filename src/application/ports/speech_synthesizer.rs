use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::VoiceGender;

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedClip {
    pub path: PathBuf,
    pub duration_seconds: Option<f64>,
}

/// Neural text-to-speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        gender: VoiceGender,
        destination: &Path,
    ) -> Result<SynthesizedClip, SynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("speech synthesizer is not configured")]
    NotConfigured,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("empty audio returned for: {0}")]
    EmptyAudio(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
