use std::path::PathBuf;

/// A synthesized clip for one segment, living inside the job's workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioResource {
    pub text: String,
    pub path: PathBuf,
    pub start_time: f64,
    pub end_time: f64,
    /// Unknown when the synthesizer does not report clip length.
    pub duration_seconds: Option<f64>,
    pub language: String,
}
