mod job_workspace;
mod media_stitcher;
mod pipeline_error;
mod pipeline_orchestrator;
mod retry;
mod speech_coordinator;
mod subtitle_formatter;

pub use job_workspace::JobWorkspace;
pub use media_stitcher::{
    COMPACT_AUDIO_BITRATE_KBPS, EncodeProfile, MIN_COMPACT_VIDEO_BITRATE_KBPS, MediaStitcher,
    StitchOutcome, StitchRequest, compact_video_bitrate_kbps,
};
pub use pipeline_error::{ErrorKind, PipelineError};
pub use pipeline_orchestrator::{
    Capabilities, DEFAULT_HISTORY_LIMIT, HistoryEntry, HistoryPage, HistoryStats, JobHandle,
    MAX_HISTORY_LIMIT, PipelineCollaborators, PipelineOrchestrator, PipelineSettings,
    UploadTicket,
};
pub use retry::{RetryError, RetryPolicy};
pub use speech_coordinator::SpeechSynthesisCoordinator;
pub use subtitle_formatter::{CAPTION_HEADER, CaptionCue, build_cues, render_captions};
