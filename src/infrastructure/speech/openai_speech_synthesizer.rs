use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::application::ports::{SpeechSynthesizer, SynthesisError, SynthesizedClip};
use crate::domain::VoiceGender;

#[derive(Debug, Clone)]
pub struct OpenAiSpeechConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub female_voice: String,
    pub male_voice: String,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    instructions: String,
    response_format: &'static str,
}

pub struct OpenAiSpeechSynthesizer {
    client: Client,
    config: OpenAiSpeechConfig,
}

impl OpenAiSpeechSynthesizer {
    pub fn new(config: OpenAiSpeechConfig) -> Self {
        Self {
            client: Client::new(),
            config: OpenAiSpeechConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        }
    }

    pub fn voice_for(&self, gender: VoiceGender) -> &str {
        match gender {
            VoiceGender::Male => &self.config.male_voice,
            VoiceGender::Female => &self.config.female_voice,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        gender: VoiceGender,
        destination: &Path,
    ) -> Result<SynthesizedClip, SynthesisError> {
        let url = format!("{}/audio/speech", self.config.base_url);
        let voice = self.voice_for(gender);
        let request = SpeechRequest {
            model: &self.config.model,
            input: text,
            voice,
            instructions: format!("Speak naturally in {}, in a clear narration style.", language),
            response_format: "mp3",
        };

        tracing::debug!(model = %self.config.model, voice = %voice, chars = text.chars().count(), "Requesting speech");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SynthesisError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::ApiRequestFailed(format!("body: {}", e)))?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio(text.chars().take(40).collect()));
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(destination, &audio).await?;

        Ok(SynthesizedClip {
            path: destination.to_path_buf(),
            duration_seconds: None,
        })
    }
}
