use crate::presentation::config::LoggingSettings;

pub const DEFAULT_FILTER: &str = "info,nativity=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    /// `LOG_FORMAT=json` still forces JSON output when settings do not.
    pub fn from_settings(settings: &LoggingSettings, environment: &str) -> Self {
        let defaults = Self::default();
        Self {
            environment: environment.to_string(),
            json_format: settings.enable_json || defaults.json_format,
            default_filter: settings.level.clone(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}
