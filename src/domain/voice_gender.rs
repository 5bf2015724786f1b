use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Male,
    #[default]
    Female,
}

impl VoiceGender {
    /// Maps the analyzer's recommendation onto a synthesizable voice.
    /// `mixed` and anything unrecognised fall back to a female voice.
    pub fn from_recommendation(recommendation: &str) -> Self {
        match recommendation.trim().to_lowercase().as_str() {
            "male" => VoiceGender::Male,
            _ => VoiceGender::Female,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Male => "male",
            VoiceGender::Female => "female",
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
