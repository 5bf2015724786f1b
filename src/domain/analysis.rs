use serde::{Deserialize, Serialize};

use super::{Segment, StorageKey, VoiceGender};

/// A single cultural adaptation the analyzer made while transcreating.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CulturalNote {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub adaptation: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Normalized output of the content analyzer for one video.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoAnalysis {
    pub segments: Vec<Segment>,
    pub cultural_analysis: Vec<CulturalNote>,
    pub video_title: String,
    pub detected_language: String,
    pub recommended_voice_gender: Option<String>,
}

/// Publishing copy for a localized video, written in the target language.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub language: String,
}

/// What Phase 1 leaves behind for the reviewer.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftResult {
    pub segments: Vec<Segment>,
    pub cultural_analysis: Vec<CulturalNote>,
    pub video_title: String,
    pub detected_language: String,
    pub voice_gender: VoiceGender,
}

impl DraftResult {
    pub fn from_analysis(analysis: VideoAnalysis) -> Self {
        let voice_gender = analysis
            .recommended_voice_gender
            .as_deref()
            .map(VoiceGender::from_recommendation)
            .unwrap_or_default();

        Self {
            segments: analysis.segments,
            cultural_analysis: analysis.cultural_analysis,
            video_title: analysis.video_title,
            detected_language: analysis.detected_language,
            voice_gender,
        }
    }
}

/// What Phase 2 produced and where it was published.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeResult {
    pub output_key: StorageKey,
    pub output_url: String,
    pub compact_key: Option<StorageKey>,
    pub compact_url: Option<String>,
    pub subtitle_key: Option<StorageKey>,
    /// Why the compact variant was not produced, when one was attempted.
    pub compact_error: Option<String>,
    pub size_mb: f64,
    pub duration_seconds: f64,
    pub words_localized: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseResult {
    Draft(DraftResult),
    Finalized(FinalizeResult),
}
