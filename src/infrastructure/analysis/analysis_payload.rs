use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::AnalyzerError;
use crate::domain::{CulturalNote, Segment, VideoAnalysis, VideoMetadata};

const DEFAULT_TITLE: &str = "Untitled Video";
const DEFAULT_SOURCE_LANGUAGE: &str = "english";

/// A timestamp as the model emits it: bare seconds or a clock string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(f64),
    Clock(String),
}

impl RawTimestamp {
    fn seconds(&self) -> f64 {
        match self {
            RawTimestamp::Seconds(s) => *s,
            RawTimestamp::Clock(text) => parse_clock(text),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawAdaptation {
    #[serde(default)]
    adaptation_note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSegment {
    #[serde(default)]
    start_time: Option<RawTimestamp>,
    #[serde(default)]
    start: Option<RawTimestamp>,
    #[serde(default)]
    end_time: Option<RawTimestamp>,
    #[serde(default)]
    end: Option<RawTimestamp>,
    #[serde(default)]
    original_text: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    translated_text: Option<String>,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    cultural_notes: Option<String>,
    #[serde(default)]
    cultural_adaptation: Option<RawAdaptation>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTtsInstructions {
    #[serde(default)]
    recommended_voice_gender: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    segments: Vec<Value>,
    #[serde(default)]
    cultural_analysis: Vec<Value>,
    #[serde(default)]
    video_title: Option<String>,
    #[serde(default)]
    detected_language: Option<String>,
    #[serde(default)]
    tts_instructions: Option<RawTtsInstructions>,
}

/// Parses `SS`, `MM:SS` or `HH:MM:SS(.mmm)` into seconds; anything else is 0.
pub fn parse_clock(text: &str) -> f64 {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return 0.0;
    }

    let mut seconds = 0.0;
    for part in &parts {
        match part.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => seconds = seconds * 60.0 + value,
            _ => return 0.0,
        }
    }
    seconds.max(0.0)
}

/// Strips a Markdown code fence if the model wrapped its JSON in one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn first_text(candidates: [Option<String>; 2]) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|t| !t.trim().is_empty())
        .unwrap_or_default()
}

fn normalize_segment(index: usize, raw: RawSegment) -> Segment {
    let start_time = raw
        .start_time
        .or(raw.start)
        .map(|t| t.seconds())
        .unwrap_or(0.0);
    let end_time = raw.end_time.or(raw.end).map(|t| t.seconds()).unwrap_or(start_time);
    let cultural_notes = raw
        .cultural_notes
        .filter(|n| !n.trim().is_empty())
        .or_else(|| raw.cultural_adaptation.and_then(|a| a.adaptation_note))
        .unwrap_or_default();

    let mut segment = Segment::new(
        index,
        start_time,
        end_time.max(start_time),
        first_text([raw.translated_text, raw.translation]),
    );
    segment.original_text = first_text([raw.original_text, raw.text]);
    segment.cultural_notes = cultural_notes;
    segment.approved = false;
    segment
}

/// Turns the model's JSON reply into a `VideoAnalysis`.
///
/// Segments are indexed by position. Entries that are not objects are
/// dropped; malformed cultural notes are skipped.
pub fn parse_analysis(text: &str) -> Result<VideoAnalysis, AnalyzerError> {
    let raw: RawAnalysis = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AnalyzerError::InvalidResponse(format!("analysis JSON: {}", e)))?;

    let segments = raw
        .segments
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawSegment>(value).ok())
        .enumerate()
        .map(|(index, raw)| normalize_segment(index, raw))
        .collect();

    let cultural_analysis = raw
        .cultural_analysis
        .into_iter()
        .filter_map(|value| serde_json::from_value::<CulturalNote>(value).ok())
        .collect();

    Ok(VideoAnalysis {
        segments,
        cultural_analysis,
        video_title: raw
            .video_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        detected_language: raw
            .detected_language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE_LANGUAGE.to_string()),
        recommended_voice_gender: raw.tts_instructions.and_then(|t| t.recommended_voice_gender),
    })
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<Value>,
}

/// Parses the metadata reply. A missing title is an invalid response;
/// non-string and blank tags are dropped.
pub fn parse_metadata(text: &str, target_language: &str) -> Result<VideoMetadata, AnalyzerError> {
    let raw: RawMetadata = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AnalyzerError::InvalidResponse(format!("metadata JSON: {}", e)))?;

    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AnalyzerError::InvalidResponse("metadata without title".to_string()))?;
    let tags = raw
        .tags
        .into_iter()
        .filter_map(|tag| tag.as_str().map(|t| t.trim().to_string()))
        .filter(|tag| !tag.is_empty())
        .collect();

    Ok(VideoMetadata {
        title,
        description: raw.description.unwrap_or_default().trim().to_string(),
        tags,
        language: target_language.to_string(),
    })
}
