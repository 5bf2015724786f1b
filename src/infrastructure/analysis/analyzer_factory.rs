use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AnalyzerError, ContentAnalyzer};
use crate::presentation::config::AnalyzerSettings;

use super::disabled_analyzer::DisabledAnalyzer;
use super::gemini_analyzer::{GeminiAnalyzer, GeminiConfig};

pub struct AnalyzerFactory;

impl AnalyzerFactory {
    pub fn create(settings: &AnalyzerSettings) -> Result<Arc<dyn ContentAnalyzer>, AnalyzerError> {
        let Some(api_key) = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        else {
            tracing::warn!("No Gemini API key configured, analysis disabled");
            return Ok(Arc::new(DisabledAnalyzer));
        };

        let analyzer = GeminiAnalyzer::new(GeminiConfig {
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_poll_attempts: settings.max_poll_attempts,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        })?;
        tracing::info!(model = %settings.model, "Gemini analyzer configured");
        Ok(Arc::new(analyzer))
    }
}
