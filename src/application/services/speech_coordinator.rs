use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};

use crate::application::ports::{MediaEngine, SpeechSynthesizer, SynthesisError};
use crate::domain::{AudioResource, Segment, VoiceGender};

/// Turns approved segments into timed audio clips.
///
/// Up to `concurrency` segments are synthesized at once; the returned
/// resources are always in segment order.
pub struct SpeechSynthesisCoordinator {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    media: Arc<dyn MediaEngine>,
    concurrency: usize,
}

impl SpeechSynthesisCoordinator {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        media: Arc<dyn MediaEngine>,
        concurrency: usize,
    ) -> Self {
        Self {
            synthesizer,
            media,
            concurrency: concurrency.max(1),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.synthesizer.is_configured()
    }

    /// Segments without text are skipped. The first failing segment aborts
    /// the whole call.
    pub async fn synthesize_segments(
        &self,
        segments: &[Segment],
        language: &str,
        gender: VoiceGender,
        output_dir: &Path,
    ) -> Result<Vec<AudioResource>, SynthesisError> {
        tokio::fs::create_dir_all(output_dir).await?;

        // Owned items keep the stream future free of borrowed segment
        // lifetimes, so the job task stays Send.
        let spoken: Vec<(usize, Segment)> = segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.has_speech())
            .map(|(position, segment)| (position, segment.clone()))
            .collect();

        tracing::debug!(
            total = segments.len(),
            spoken = spoken.len(),
            language = %language,
            gender = %gender,
            "Synthesizing segments"
        );

        let output_dir = output_dir.to_path_buf();
        let language = language.to_string();
        stream::iter(spoken)
            .map(|(position, segment)| {
                let synthesizer = Arc::clone(&self.synthesizer);
                let media = Arc::clone(&self.media);
                let destination = output_dir.join(format!("segment_{:04}.mp3", position));
                let language = language.clone();
                async move {
                    synthesize_one(synthesizer, media, segment, language, gender, destination).await
                }
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}

async fn synthesize_one(
    synthesizer: Arc<dyn SpeechSynthesizer>,
    media: Arc<dyn MediaEngine>,
    segment: Segment,
    language: String,
    gender: VoiceGender,
    destination: PathBuf,
) -> Result<AudioResource, SynthesisError> {
    let text = segment.translated_text.trim();
    let clip = synthesizer
        .synthesize(text, &language, gender, &destination)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, segment = segment.index, "Segment synthesis failed");
        })?;

    let duration_seconds = match clip.duration_seconds {
        Some(duration) => Some(duration),
        None => media
            .probe(&clip.path)
            .await
            .map(|probe| probe.duration_seconds)
            .inspect_err(|e| {
                tracing::warn!(error = %e, segment = segment.index, "Could not measure clip length");
            })
            .ok(),
    };

    Ok(AudioResource {
        text: text.to_string(),
        path: clip.path,
        start_time: segment.start_time,
        end_time: segment.end_time,
        duration_seconds,
        language,
    })
}
