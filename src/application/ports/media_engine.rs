use std::path::{Path, PathBuf};

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct MediaProbe {
    pub duration_seconds: f64,
    pub size_bytes: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Rate control for the video stream.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoQuality {
    /// Constant quality; higher `crf` trades quality for size.
    ConstantRate { crf: u8 },
    /// Single-pass average bitrate target.
    TargetBitrate { kbps: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSpec {
    /// Output height in pixels, width follows the source aspect ratio.
    pub scale_height: Option<u32>,
    pub quality: VideoQuality,
    pub preset: &'static str,
    pub audio_bitrate_kbps: u32,
    /// Move the index to the front of the container for progressive playback.
    pub faststart: bool,
}

/// Replace a video's audio with `audio`, delayed by `audio_delay_seconds`,
/// stopping at the end of the shorter stream.
#[derive(Debug, Clone, PartialEq)]
pub struct MuxRequest {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
    pub audio_delay_seconds: f64,
    pub encode: EncodeSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encode: EncodeSpec,
}

/// The audio/video codec engine.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    async fn version(&self) -> Result<String, MediaError>;

    async fn probe(&self, path: &Path) -> Result<MediaProbe, MediaError>;

    /// Joins `inputs` back to back into one audio file, no cross-fading.
    async fn concat_audio(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError>;

    async fn replace_audio(&self, request: &MuxRequest) -> Result<(), MediaError>;

    async fn transcode(&self, request: &TranscodeRequest) -> Result<(), MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media engine not available: {0}")]
    NotAvailable(String),
    #[error("probe failed: {0}")]
    ProbeFailed(String),
    #[error("{tool} exited with code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
