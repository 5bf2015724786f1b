use std::path::{Path, PathBuf};

use crate::application::ports::{EncodeSpec, MuxRequest, TranscodeRequest, VideoQuality};

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn video_codec_args(encode: &EncodeSpec) -> Vec<String> {
    let mut args = vec![
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        encode.preset.to_string(),
    ];
    match encode.quality {
        VideoQuality::ConstantRate { crf } => {
            args.extend(["-crf".to_string(), crf.to_string()]);
        }
        VideoQuality::TargetBitrate { kbps } => {
            args.extend(["-b:v".to_string(), format!("{}k", kbps)]);
        }
    }
    args
}

fn audio_and_container_args(encode: &EncodeSpec) -> Vec<String> {
    let mut args = vec![
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{}k", encode.audio_bitrate_kbps),
    ];
    if encode.faststart {
        args.extend(["-movflags".to_string(), "+faststart".to_string()]);
    }
    args
}

/// Delay in whole milliseconds for the `adelay` filter.
pub fn delay_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

/// Escapes a path for an ffmpeg concat list entry.
fn concat_entry(path: &Path) -> String {
    format!("file '{}'", path_arg(path).replace('\'', r"'\''"))
}

pub fn concat_list(inputs: &[PathBuf]) -> String {
    let mut list = inputs
        .iter()
        .map(|p| concat_entry(p))
        .collect::<Vec<_>>()
        .join("\n");
    list.push('\n');
    list
}

pub fn concat_args(list_file: &Path, output: &Path, bitrate_kbps: u32) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        path_arg(list_file),
        "-c:a".to_string(),
        "libmp3lame".to_string(),
        "-b:a".to_string(),
        format!("{}k", bitrate_kbps),
        path_arg(output),
    ]
}

/// Video from input 0, audio from input 1 shifted by the delay, cut at the
/// shorter stream.
pub fn replace_audio_args(request: &MuxRequest) -> Vec<String> {
    let mut graph = Vec::new();
    let video_label = match request.encode.scale_height {
        Some(height) => {
            graph.push(format!("[0:v]scale=-2:{}[v]", height));
            "[v]".to_string()
        }
        None => "0:v".to_string(),
    };
    let delay = delay_millis(request.audio_delay_seconds);
    let audio_label = if delay > 0 {
        graph.push(format!("[1:a]adelay={}:all=1[a]", delay));
        "[a]".to_string()
    } else {
        "1:a".to_string()
    };

    let mut args = vec![
        "-y".to_string(),
        "-i".to_string(),
        path_arg(&request.video),
        "-i".to_string(),
        path_arg(&request.audio),
    ];
    if !graph.is_empty() {
        args.extend(["-filter_complex".to_string(), graph.join(";")]);
    }
    args.extend([
        "-map".to_string(),
        video_label,
        "-map".to_string(),
        audio_label,
    ]);
    args.extend(video_codec_args(&request.encode));
    args.extend(audio_and_container_args(&request.encode));
    args.push("-shortest".to_string());
    args.push(path_arg(&request.output));
    args
}

pub fn transcode_args(request: &TranscodeRequest) -> Vec<String> {
    let mut args = vec!["-y".to_string(), "-i".to_string(), path_arg(&request.input)];
    if let Some(height) = request.encode.scale_height {
        args.extend(["-vf".to_string(), format!("scale=-2:{}", height)]);
    }
    args.extend(video_codec_args(&request.encode));
    args.extend(audio_and_container_args(&request.encode));
    args.push(path_arg(&request.output));
    args
}

pub fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_format".to_string(),
        "-show_streams".to_string(),
        path_arg(path),
    ]
}
