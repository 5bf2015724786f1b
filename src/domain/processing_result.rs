use std::path::{Path, PathBuf};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Outcome of a media operation. A failed result never carries an output.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    output: Option<PathBuf>,
    size_bytes: u64,
    duration_seconds: f64,
    error: Option<String>,
}

impl ProcessingResult {
    pub fn succeeded(output: PathBuf, size_bytes: u64, duration_seconds: f64) -> Self {
        Self {
            output: Some(output),
            size_bytes,
            duration_seconds,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: None,
            size_bytes: 0,
            duration_seconds: 0.0,
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.output.is_some()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
