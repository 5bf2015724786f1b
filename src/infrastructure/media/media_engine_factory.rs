use std::sync::Arc;

use crate::application::ports::MediaEngine;
use crate::presentation::config::MediaSettings;

use super::disabled_media_engine::DisabledMediaEngine;
use super::ffmpeg_engine::FfmpegEngine;

pub struct MediaEngineFactory;

impl MediaEngineFactory {
    /// Probes `ffmpeg -version` once; a missing binary disables media work.
    pub async fn create(settings: &MediaSettings) -> Arc<dyn MediaEngine> {
        let engine = FfmpegEngine::new(&settings.ffmpeg_path, &settings.ffprobe_path);
        match engine.version().await {
            Ok(version) => {
                tracing::info!(version = %version, "ffmpeg available");
                Arc::new(engine)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ffmpeg unavailable, media processing disabled");
                Arc::new(DisabledMediaEngine::new(e.to_string()))
            }
        }
    }
}
