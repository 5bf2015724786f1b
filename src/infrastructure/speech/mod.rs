mod disabled_speech_synthesizer;
mod openai_speech_synthesizer;
mod speech_synthesizer_factory;

pub use disabled_speech_synthesizer::DisabledSpeechSynthesizer;
pub use openai_speech_synthesizer::{OpenAiSpeechConfig, OpenAiSpeechSynthesizer};
pub use speech_synthesizer_factory::SpeechSynthesizerFactory;
