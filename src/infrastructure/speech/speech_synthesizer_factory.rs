use std::sync::Arc;

use crate::application::ports::SpeechSynthesizer;
use crate::presentation::config::SpeechSettings;

use super::disabled_speech_synthesizer::DisabledSpeechSynthesizer;
use super::openai_speech_synthesizer::{OpenAiSpeechConfig, OpenAiSpeechSynthesizer};

pub struct SpeechSynthesizerFactory;

impl SpeechSynthesizerFactory {
    pub fn create(settings: &SpeechSettings) -> Arc<dyn SpeechSynthesizer> {
        match settings.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(api_key) => {
                tracing::info!(model = %settings.model, "OpenAI speech configured");
                Arc::new(OpenAiSpeechSynthesizer::new(OpenAiSpeechConfig {
                    api_key: api_key.to_string(),
                    model: settings.model.clone(),
                    base_url: settings.base_url.clone(),
                    female_voice: settings.female_voice.clone(),
                    male_voice: settings.male_voice.clone(),
                }))
            }
            None => {
                tracing::warn!("No speech API key configured, synthesis disabled");
                Arc::new(DisabledSpeechSynthesizer)
            }
        }
    }
}
