mod content_analyzer;
mod history_store;
mod job_registry;
mod media_engine;
mod speech_synthesizer;
mod video_store;

pub use content_analyzer::{AnalyzerError, ContentAnalyzer};
pub use history_store::{HistoryError, HistoryStore};
pub use job_registry::{JobRegistry, RegistryError};
pub use media_engine::{
    EncodeSpec, MediaEngine, MediaError, MediaProbe, MuxRequest, TranscodeRequest, VideoQuality,
};
pub use speech_synthesizer::{SpeechSynthesizer, SynthesisError, SynthesizedClip};
pub use video_store::{StorageError, VideoStore};
