use std::sync::Arc;

use tempfile::TempDir;

use nativity::application::ports::SynthesisError;
use nativity::application::services::SpeechSynthesisCoordinator;
use nativity::domain::VoiceGender;

use crate::helpers::{MockMediaEngine, MockSpeechSynthesizer, segment};

#[tokio::test]
async fn given_concurrent_synthesis_when_clips_finish_out_of_order_then_result_keeps_segment_order() {
    let dir = TempDir::new().unwrap();
    let synthesizer = Arc::new(MockSpeechSynthesizer::new());
    let coordinator = SpeechSynthesisCoordinator::new(synthesizer.clone(), Arc::new(MockMediaEngine::new()), 4);
    let segments = vec![
        segment(0, 0.0, 1.0, "a"),
        segment(1, 1.0, 2.0, "a much longer sentence"),
        segment(2, 2.0, 3.0, "mid length"),
    ];

    let audio = coordinator
        .synthesize_segments(&segments, "tamil", VoiceGender::Female, &dir.path().join("audio"))
        .await
        .unwrap();

    let texts: Vec<&str> = audio.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "a much longer sentence", "mid length"]);
    assert_eq!(audio[1].start_time, 1.0);
    assert!(audio.iter().all(|a| a.path.exists() && a.language == "tamil"));
}

#[tokio::test]
async fn given_blank_segments_when_synthesizing_then_they_are_skipped() {
    let dir = TempDir::new().unwrap();
    let synthesizer = Arc::new(MockSpeechSynthesizer::new());
    let coordinator = SpeechSynthesisCoordinator::new(synthesizer.clone(), Arc::new(MockMediaEngine::new()), 2);
    let segments = vec![
        segment(0, 0.0, 1.0, "ondru"),
        segment(1, 1.0, 2.0, " \n "),
        segment(2, 2.0, 3.0, "moondru"),
    ];

    let audio = coordinator
        .synthesize_segments(&segments, "tamil", VoiceGender::Male, dir.path())
        .await
        .unwrap();

    assert_eq!(audio.len(), 2);
    assert_eq!(synthesizer.calls().len(), 2);
}

#[tokio::test]
async fn given_one_failing_segment_when_synthesizing_then_whole_call_fails() {
    let dir = TempDir::new().unwrap();
    let synthesizer = Arc::new(MockSpeechSynthesizer::failing_on("irandu"));
    let coordinator = SpeechSynthesisCoordinator::new(synthesizer, Arc::new(MockMediaEngine::new()), 1);
    let segments = vec![
        segment(0, 0.0, 1.0, "ondru"),
        segment(1, 1.0, 2.0, "irandu"),
    ];

    let error = coordinator
        .synthesize_segments(&segments, "tamil", VoiceGender::Male, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(error, SynthesisError::ApiRequestFailed(_)));
}

#[tokio::test]
async fn given_clip_without_reported_length_when_synthesizing_then_length_is_measured() {
    let dir = TempDir::new().unwrap();
    let coordinator = SpeechSynthesisCoordinator::new(
        Arc::new(MockSpeechSynthesizer::without_durations()),
        Arc::new(MockMediaEngine::new()),
        2,
    );
    let segments = vec![segment(0, 0.0, 1.0, "ondru")];

    let audio = coordinator
        .synthesize_segments(&segments, "tamil", VoiceGender::Male, dir.path())
        .await
        .unwrap();

    assert_eq!(audio[0].duration_seconds, Some(60.0));
}

#[tokio::test]
async fn given_clip_with_reported_length_when_synthesizing_then_reported_length_is_kept() {
    let dir = TempDir::new().unwrap();
    let coordinator = SpeechSynthesisCoordinator::new(
        Arc::new(MockSpeechSynthesizer::new()),
        Arc::new(MockMediaEngine::new()),
        2,
    );
    let segments = vec![segment(0, 0.0, 1.0, "ondru")];

    let audio = coordinator
        .synthesize_segments(&segments, "tamil", VoiceGender::Male, dir.path())
        .await
        .unwrap();

    assert_eq!(audio[0].duration_seconds, Some(1.0));
}
