use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::{PipelineSettings, RetryPolicy};

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub analyzer: AnalyzerSettings,
    pub speech: SpeechSettings,
    pub history: HistorySettings,
    pub media: MediaSettings,
    pub pipeline: PipelineTuning,
    pub logging: LoggingSettings,
}

impl Settings {
    /// `appsettings.<env>` (optional) overlaid with `APP__SECTION__KEY`
    /// environment variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str().to_lowercase()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    S3,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub bucket: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,
    pub local_path: String,
    /// Base URL under which `local_path` is served; local links are not signed.
    pub public_base_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::default(),
            bucket: None,
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            local_path: "./data/storage".to_string(),
            public_base_url: "http://localhost:8000/files".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            poll_interval_ms: 2000,
            max_poll_attempts: 90,
            request_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub female_voice: String,
    pub male_voice: String,
    /// Segments synthesized at once within one job.
    pub concurrency: usize,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini-tts".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            female_voice: "nova".to_string(),
            male_voice: "onyx".to_string(),
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryProviderSetting {
    #[default]
    Postgres,
    Memory,
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub provider: HistoryProviderSetting,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            provider: HistoryProviderSetting::default(),
            database_url: None,
            max_connections: 5,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineTuning {
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub compact_threshold_mb: f64,
    pub compact_target_mb: f64,
    pub url_ttl_secs: u64,
    pub optimize_for_mobile: bool,
    pub temp_root: Option<PathBuf>,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            retry_max_attempts: 10,
            retry_base_delay_ms: 5000,
            compact_threshold_mb: 15.0,
            compact_target_mb: 14.5,
            url_ttl_secs: 3600,
            optimize_for_mobile: true,
            temp_root: None,
        }
    }
}

impl PipelineTuning {
    pub fn to_pipeline_settings(&self, synthesis_concurrency: usize) -> PipelineSettings {
        PipelineSettings {
            retry: RetryPolicy::new(
                self.retry_max_attempts,
                Duration::from_millis(self.retry_base_delay_ms),
            ),
            compact_threshold_mb: self.compact_threshold_mb,
            compact_target_mb: self.compact_target_mb,
            url_ttl: Duration::from_secs(self.url_ttl_secs),
            optimize_for_mobile: self.optimize_for_mobile,
            temp_root: self.temp_root.clone().unwrap_or_else(std::env::temp_dir),
            synthesis_concurrency,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,nativity=debug,tower_http=debug".to_string(),
            enable_json: false,
        }
    }
}
