use serde::{Deserialize, Serialize};

use crate::domain::{
    CulturalNote, DraftResult, FinalizeResult, Job, PhaseResult, Segment, TargetLanguage,
    VideoMetadata,
};

/// A reviewed segment as sent by the editor. Accepts the short field names
/// the draft endpoint's consumers have historically used.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentPayload {
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(alias = "start")]
    pub start_time: f64,
    #[serde(alias = "end")]
    pub end_time: f64,
    #[serde(default)]
    pub original_text: String,
    #[serde(alias = "text")]
    pub translated_text: String,
    #[serde(default)]
    pub cultural_notes: String,
    #[serde(default = "approved_by_default", alias = "is_approved")]
    pub approved: bool,
}

fn approved_by_default() -> bool {
    true
}

impl SegmentPayload {
    pub fn into_segment(self, position: usize) -> Segment {
        let mut segment = Segment::new(
            self.index.unwrap_or(position),
            self.start_time,
            self.end_time,
            self.translated_text,
        );
        segment.original_text = self.original_text;
        segment.cultural_notes = self.cultural_notes;
        segment.approved = self.approved;
        segment
    }
}

#[derive(Debug, Serialize)]
pub struct DraftResultDto {
    pub segments: Vec<Segment>,
    pub cultural_analysis: Vec<CulturalNote>,
    pub video_title: String,
    pub detected_language: String,
    pub recommended_voice_gender: String,
    pub ready_for_review: bool,
}

impl From<&DraftResult> for DraftResultDto {
    fn from(draft: &DraftResult) -> Self {
        Self {
            segments: draft.segments.clone(),
            cultural_analysis: draft.cultural_analysis.clone(),
            video_title: draft.video_title.clone(),
            detected_language: draft.detected_language.clone(),
            recommended_voice_gender: draft.voice_gender.to_string(),
            ready_for_review: !draft.segments.is_empty(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FinalizeResultDto {
    pub output_key: String,
    pub output_url: String,
    pub compact_key: Option<String>,
    pub compact_url: Option<String>,
    pub subtitle_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact_error: Option<String>,
    pub size_mb: f64,
    pub duration_seconds: f64,
    pub words_localized: usize,
}

impl From<&FinalizeResult> for FinalizeResultDto {
    fn from(result: &FinalizeResult) -> Self {
        Self {
            output_key: result.output_key.to_string(),
            output_url: result.output_url.clone(),
            compact_key: result.compact_key.as_ref().map(ToString::to_string),
            compact_url: result.compact_url.clone(),
            subtitle_key: result.subtitle_key.as_ref().map(ToString::to_string),
            compact_error: result.compact_error.clone(),
            size_mb: (result.size_mb * 100.0).round() / 100.0,
            duration_seconds: result.duration_seconds,
            words_localized: result.words_localized,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseResultDto {
    Draft(DraftResultDto),
    Finalized(FinalizeResultDto),
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub progress: u8,
    pub message: String,
    pub target_language: String,
    pub output_key: Option<String>,
    pub error: Option<String>,
    pub result: Option<PhaseResultDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Job> for JobStatusResponse {
    fn from(job: &Job) -> Self {
        let result = job.result.as_ref().map(|r| match r {
            PhaseResult::Draft(draft) => PhaseResultDto::Draft(draft.into()),
            PhaseResult::Finalized(done) => PhaseResultDto::Finalized(done.into()),
        });

        Self {
            job_id: job.id.to_string(),
            status: job.status.to_string(),
            progress: job.progress,
            message: job.message.clone(),
            target_language: job.target_language.clone(),
            output_key: job.output_reference.as_ref().map(ToString::to_string),
            error: job.error.clone(),
            result,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobAcceptedResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageDto {
    pub code: &'static str,
    pub name: &'static str,
    pub native: &'static str,
}

impl From<TargetLanguage> for LanguageDto {
    fn from(language: TargetLanguage) -> Self {
        Self {
            code: language.code(),
            name: language.display_name(),
            native: language.native_name(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageDto>,
}

#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub language: String,
}

impl From<VideoMetadata> for MetadataResponse {
    fn from(metadata: VideoMetadata) -> Self {
        Self {
            title: metadata.title,
            description: metadata.description,
            tags: metadata.tags,
            language: metadata.language,
        }
    }
}
