use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{SpeechSynthesizer, SynthesisError, SynthesizedClip};
use crate::domain::VoiceGender;

pub struct DisabledSpeechSynthesizer;

#[async_trait]
impl SpeechSynthesizer for DisabledSpeechSynthesizer {
    fn is_configured(&self) -> bool {
        false
    }

    async fn synthesize(
        &self,
        _text: &str,
        _language: &str,
        _gender: VoiceGender,
        _destination: &Path,
    ) -> Result<SynthesizedClip, SynthesisError> {
        Err(SynthesisError::NotConfigured)
    }
}
