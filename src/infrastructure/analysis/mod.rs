mod analysis_payload;
mod analyzer_factory;
mod disabled_analyzer;
mod gemini_analyzer;

pub use analysis_payload::{parse_analysis, parse_clock, parse_metadata};
pub use analyzer_factory::AnalyzerFactory;
pub use disabled_analyzer::DisabledAnalyzer;
pub use gemini_analyzer::{GeminiAnalyzer, GeminiConfig, classify_failure};
