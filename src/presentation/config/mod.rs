mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    AnalyzerSettings, HistoryProviderSetting, HistorySettings, LoggingSettings, MediaSettings,
    PipelineTuning, ServerSettings, Settings, SpeechSettings, StorageProviderSetting,
    StorageSettings,
};
