use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{MediaEngine, MediaError, MediaProbe, MuxRequest, TranscodeRequest};

/// Used when the ffmpeg binaries could not be found at start-up.
pub struct DisabledMediaEngine {
    reason: String,
}

impl DisabledMediaEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> MediaError {
        MediaError::NotAvailable(self.reason.clone())
    }
}

#[async_trait]
impl MediaEngine for DisabledMediaEngine {
    fn is_configured(&self) -> bool {
        false
    }

    async fn version(&self) -> Result<String, MediaError> {
        Err(self.unavailable())
    }

    async fn probe(&self, _path: &Path) -> Result<MediaProbe, MediaError> {
        Err(self.unavailable())
    }

    async fn concat_audio(&self, _inputs: &[PathBuf], _output: &Path) -> Result<(), MediaError> {
        Err(self.unavailable())
    }

    async fn replace_audio(&self, _request: &MuxRequest) -> Result<(), MediaError> {
        Err(self.unavailable())
    }

    async fn transcode(&self, _request: &TranscodeRequest) -> Result<(), MediaError> {
        Err(self.unavailable())
    }
}
