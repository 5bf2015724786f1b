use std::io;
use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::application::ports::{MediaEngine, MediaError, MediaProbe, MuxRequest, TranscodeRequest};

use super::ffmpeg_args::{
    concat_args, concat_list, probe_args, replace_audio_args, transcode_args,
};

const CONCAT_BITRATE_KBPS: u32 = 128;
const STDERR_TAIL_CHARS: usize = 600;

/// Shells out to the `ffmpeg` and `ffprobe` binaries.
pub struct FfmpegEngine {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegEngine {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<Output, MediaError> {
        tracing::debug!(program = %program, args = ?args, "Running media command");

        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => MediaError::NotAvailable(format!("{} not found", program)),
                _ => MediaError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::CommandFailed {
                tool: program.to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                message: tail(&stderr, STDERR_TAIL_CHARS),
            });
        }

        Ok(output)
    }
}

fn tail(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let count = trimmed.chars().count();
    if count <= max_chars {
        return trimmed.to_string();
    }
    trimmed.chars().skip(count - max_chars).collect()
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: ProbeFormat,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Reads ffprobe's JSON. A missing duration is an error; size falls back
/// to `fallback_size`.
pub fn parse_probe(json: &[u8], fallback_size: u64) -> Result<MediaProbe, MediaError> {
    let probe: ProbeOutput =
        serde_json::from_slice(json).map_err(|e| MediaError::ProbeFailed(e.to_string()))?;

    let duration_seconds = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| MediaError::ProbeFailed("no duration reported".to_string()))?;
    let size_bytes = probe
        .format
        .size
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(fallback_size);
    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    Ok(MediaProbe {
        duration_seconds,
        size_bytes,
        width: video.and_then(|s| s.width),
        height: video.and_then(|s| s.height),
    })
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn version(&self) -> Result<String, MediaError> {
        let output = self.run(&self.ffmpeg, &["-version".to_string()]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn probe(&self, path: &Path) -> Result<MediaProbe, MediaError> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| MediaError::ProbeFailed(format!("{}: {}", path.display(), e)))?
            .len();
        let output = self.run(&self.ffprobe, &probe_args(path)).await?;
        parse_probe(&output.stdout, size)
    }

    async fn concat_audio(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError> {
        if inputs.is_empty() {
            return Err(MediaError::InvalidInput("nothing to concatenate".to_string()));
        }

        let list_file = output.with_extension("concat.txt");
        tokio::fs::write(&list_file, concat_list(inputs)).await?;
        self.run(&self.ffmpeg, &concat_args(&list_file, output, CONCAT_BITRATE_KBPS))
            .await?;

        tracing::debug!(clips = inputs.len(), output = %output.display(), "Audio concatenated");
        Ok(())
    }

    async fn replace_audio(&self, request: &MuxRequest) -> Result<(), MediaError> {
        self.run(&self.ffmpeg, &replace_audio_args(request)).await?;
        tracing::debug!(
            output = %request.output.display(),
            delay_seconds = request.audio_delay_seconds,
            "Audio track replaced"
        );
        Ok(())
    }

    async fn transcode(&self, request: &TranscodeRequest) -> Result<(), MediaError> {
        self.run(&self.ffmpeg, &transcode_args(request)).await?;
        Ok(())
    }
}
