mod disabled_media_engine;
mod ffmpeg_args;
mod ffmpeg_engine;
mod media_engine_factory;

pub use disabled_media_engine::DisabledMediaEngine;
pub use ffmpeg_args::{concat_list, delay_millis, replace_audio_args, transcode_args};
pub use ffmpeg_engine::{FfmpegEngine, parse_probe};
pub use media_engine_factory::MediaEngineFactory;
