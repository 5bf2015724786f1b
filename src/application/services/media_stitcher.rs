use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{
    EncodeSpec, MediaEngine, MediaError, MuxRequest, TranscodeRequest, VideoQuality,
};
use crate::domain::{AudioResource, ProcessingResult};

pub const COMPACT_AUDIO_BITRATE_KBPS: u32 = 96;
pub const MIN_COMPACT_VIDEO_BITRATE_KBPS: u32 = 200;
const STITCH_AUDIO_BITRATE_KBPS: u32 = 128;

/// Single-pass video bitrate aimed at landing near `target_size_mb`.
///
/// `floor(target_mb * 8192 / duration) - audio_kbps`, never below
/// `MIN_COMPACT_VIDEO_BITRATE_KBPS`. The resulting file size is approximate.
pub fn compact_video_bitrate_kbps(target_size_mb: f64, duration_seconds: f64) -> u32 {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return MIN_COMPACT_VIDEO_BITRATE_KBPS;
    }

    let total_kbps = (target_size_mb * 8192.0 / duration_seconds).floor() as i64;
    let video_kbps = total_kbps - i64::from(COMPACT_AUDIO_BITRATE_KBPS);
    video_kbps.clamp(i64::from(MIN_COMPACT_VIDEO_BITRATE_KBPS), i64::from(u32::MAX)) as u32
}

pub struct EncodeProfile;

impl EncodeProfile {
    /// 480p, size-leaning quality, progressive-download layout.
    pub fn mobile() -> EncodeSpec {
        EncodeSpec {
            scale_height: Some(480),
            quality: VideoQuality::ConstantRate { crf: 28 },
            preset: "fast",
            audio_bitrate_kbps: STITCH_AUDIO_BITRATE_KBPS,
            faststart: true,
        }
    }

    /// Source resolution, standard quality.
    pub fn standard() -> EncodeSpec {
        EncodeSpec {
            scale_height: None,
            quality: VideoQuality::ConstantRate { crf: 23 },
            preset: "medium",
            audio_bitrate_kbps: STITCH_AUDIO_BITRATE_KBPS,
            faststart: false,
        }
    }

    pub fn compact(video_kbps: u32) -> EncodeSpec {
        EncodeSpec {
            scale_height: Some(360),
            quality: VideoQuality::TargetBitrate { kbps: video_kbps },
            preset: "fast",
            audio_bitrate_kbps: COMPACT_AUDIO_BITRATE_KBPS,
            faststart: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StitchRequest {
    pub video: PathBuf,
    pub audio: Vec<AudioResource>,
    /// Global shift applied to the whole synthesized track.
    pub audio_delay_seconds: f64,
    pub work_dir: PathBuf,
    pub output: PathBuf,
    pub compact_output: PathBuf,
    pub optimize_for_mobile: bool,
}

#[derive(Debug, Clone)]
pub struct StitchOutcome {
    pub primary: ProcessingResult,
    /// Present only when the primary output exceeded the compact threshold.
    pub compact: Option<ProcessingResult>,
}

/// Replaces a video's soundtrack with synthesized speech.
///
/// Clips are joined back to back and the joined track is shifted once by
/// the request's delay; individual clips are never re-timed against their
/// segment timestamps. The muxed output ends with the shorter stream.
pub struct MediaStitcher {
    engine: Arc<dyn MediaEngine>,
    compact_threshold_mb: f64,
    compact_target_mb: f64,
}

impl MediaStitcher {
    pub fn new(engine: Arc<dyn MediaEngine>, compact_threshold_mb: f64, compact_target_mb: f64) -> Self {
        Self {
            engine,
            compact_threshold_mb,
            compact_target_mb,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_configured()
    }

    pub async fn stitch(&self, request: &StitchRequest) -> Result<ProcessingResult, MediaError> {
        let source = self.engine.probe(&request.video).await?;
        tracing::debug!(
            duration_seconds = source.duration_seconds,
            clips = request.audio.len(),
            "Source video probed"
        );

        if request.audio.is_empty() {
            return Err(MediaError::InvalidInput("no audio segments provided".to_string()));
        }

        let clips: Vec<PathBuf> = request.audio.iter().map(|a| a.path.clone()).collect();
        let combined = request.work_dir.join("combined_audio.mp3");
        self.engine.concat_audio(&clips, &combined).await?;

        let encode = if request.optimize_for_mobile {
            EncodeProfile::mobile()
        } else {
            EncodeProfile::standard()
        };

        self.engine
            .replace_audio(&MuxRequest {
                video: request.video.clone(),
                audio: combined,
                output: request.output.clone(),
                audio_delay_seconds: request.audio_delay_seconds.max(0.0),
                encode,
            })
            .await?;

        self.describe(&request.output).await
    }

    /// Re-encodes `input` at 360p with a bitrate derived from its duration.
    pub async fn create_compact(
        &self,
        input: &Path,
        output: &Path,
        target_size_mb: f64,
    ) -> Result<ProcessingResult, MediaError> {
        let probe = self.engine.probe(input).await?;
        let video_kbps = compact_video_bitrate_kbps(target_size_mb, probe.duration_seconds);
        tracing::debug!(
            duration_seconds = probe.duration_seconds,
            video_kbps = video_kbps,
            target_size_mb = target_size_mb,
            "Encoding compact variant"
        );

        self.engine
            .transcode(&TranscodeRequest {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                encode: EncodeProfile::compact(video_kbps),
            })
            .await?;

        self.describe(output).await
    }

    /// Stitches the primary output and, when it is over the threshold,
    /// attempts a compact variant. A compact failure is reported in the
    /// outcome and leaves the primary intact.
    pub async fn stitch_with_compact(&self, request: &StitchRequest) -> Result<StitchOutcome, MediaError> {
        let primary = self.stitch(request).await?;

        if primary.size_mb() <= self.compact_threshold_mb {
            return Ok(StitchOutcome {
                primary,
                compact: None,
            });
        }

        tracing::info!(
            size_mb = primary.size_mb(),
            threshold_mb = self.compact_threshold_mb,
            "Primary output over threshold, creating compact variant"
        );

        let compact = match self
            .create_compact(&request.output, &request.compact_output, self.compact_target_mb)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Compact variant failed");
                ProcessingResult::failed(e.to_string())
            }
        };

        Ok(StitchOutcome {
            primary,
            compact: Some(compact),
        })
    }

    async fn describe(&self, output: &Path) -> Result<ProcessingResult, MediaError> {
        let probe = self.engine.probe(output).await?;
        Ok(ProcessingResult::succeeded(
            output.to_path_buf(),
            probe.size_bytes,
            probe.duration_seconds,
        ))
    }
}
