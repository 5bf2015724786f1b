use std::fmt;

use crate::domain::Segment;

pub const CAPTION_HEADER: &str = "WEBVTT";

/// One numbered caption block.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionCue {
    pub number: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionCue {
    /// `HH:MM:SS.mmm`, hours are not wrapped.
    pub fn format_timestamp(seconds: f64) -> String {
        let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let ms = total_ms % 1000;
        let total_secs = total_ms / 1000;
        let secs = total_secs % 60;
        let total_mins = total_secs / 60;
        let mins = total_mins % 60;
        let hours = total_mins / 60;

        format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
    }
}

impl fmt::Display for CaptionCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.number)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start),
            Self::format_timestamp(self.end)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Segments without text are skipped and do not consume a cue number.
pub fn build_cues(segments: &[Segment]) -> Vec<CaptionCue> {
    segments
        .iter()
        .filter(|segment| segment.has_speech())
        .enumerate()
        .map(|(position, segment)| CaptionCue {
            number: position + 1,
            start: segment.start_time,
            end: segment.end_time,
            text: segment.translated_text.trim().to_string(),
        })
        .collect()
}

pub fn render_captions(segments: &[Segment]) -> String {
    let mut document = format!("{}\n\n", CAPTION_HEADER);
    for cue in build_cues(segments) {
        document.push_str(&cue.to_string());
    }
    document
}
