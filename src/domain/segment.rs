use serde::{Deserialize, Serialize};

/// One timed unit of speech in a translation draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub original_text: String,
    pub translated_text: String,
    pub cultural_notes: String,
    pub approved: bool,
}

impl Segment {
    pub fn new(index: usize, start_time: f64, end_time: f64, translated_text: impl Into<String>) -> Self {
        Self {
            index,
            start_time,
            end_time,
            original_text: String::new(),
            translated_text: translated_text.into(),
            cultural_notes: String::new(),
            approved: false,
        }
    }

    /// Whether the segment carries any text worth voicing or captioning.
    pub fn has_speech(&self) -> bool {
        !self.translated_text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.translated_text.split_whitespace().count()
    }
}

/// Sum of whitespace-delimited tokens across all translated text.
pub fn count_words(segments: &[Segment]) -> usize {
    segments.iter().map(Segment::word_count).sum()
}
