mod analysis;
mod audio_resource;
mod history_record;
mod job;
mod job_id;
mod job_status;
mod processing_result;
mod segment;
mod storage_key;
mod target_language;
mod user_id;
mod voice_gender;

pub use analysis::{
    CulturalNote, DraftResult, FinalizeResult, PhaseResult, VideoAnalysis, VideoMetadata,
};
pub use audio_resource::AudioResource;
pub use history_record::{HistoryStatus, JobHistoryRecord, StatusUpdate};
pub use job::{Job, JobTransition, TransitionError};
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use processing_result::ProcessingResult;
pub use segment::{Segment, count_words};
pub use storage_key::{InvalidStorageKey, StorageKey};
pub use target_language::{TargetLanguage, UnsupportedLanguage};
pub use user_id::UserId;
pub use voice_gender::VoiceGender;
