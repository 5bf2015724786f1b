use crate::application::ports::{
    AnalyzerError, HistoryError, MediaError, RegistryError, StorageError, SynthesisError,
};
use crate::application::services::retry::RetryError;
use crate::domain::JobId;

/// How a pipeline failure should be surfaced to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0} is not configured")]
    Configuration(&'static str),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("job {0} is still running")]
    JobBusy(JobId),
    #[error("upstream still busy after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: AnalyzerError },
    #[error("analysis failed: {0}")]
    Analysis(AnalyzerError),
    #[error("transfer failed: {0}")]
    Transfer(#[from] StorageError),
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("media processing failed: {0}")]
    MediaProcessing(#[from] MediaError),
    #[error("job registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("workspace error: {0}")]
    Workspace(#[from] std::io::Error),
    #[error("job task panicked: {0}")]
    Panicked(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Configuration(_)
            | PipelineError::Analysis(AnalyzerError::NotConfigured)
            | PipelineError::Transfer(StorageError::NotConfigured)
            | PipelineError::Synthesis(SynthesisError::NotConfigured)
            | PipelineError::MediaProcessing(MediaError::NotAvailable(_))
            | PipelineError::History(HistoryError::NotConfigured) => ErrorKind::Configuration,
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::JobNotFound(_)
            | PipelineError::Registry(RegistryError::NotFound(_))
            | PipelineError::History(HistoryError::NotFound(_)) => ErrorKind::NotFound,
            PipelineError::JobBusy(_) | PipelineError::Registry(RegistryError::Busy(_)) => {
                ErrorKind::Conflict
            }
            _ => ErrorKind::Internal,
        }
    }
}

impl From<RetryError<AnalyzerError>> for PipelineError {
    fn from(error: RetryError<AnalyzerError>) -> Self {
        match error {
            RetryError::Exhausted { attempts, last } => {
                PipelineError::RetriesExhausted { attempts, last }
            }
            RetryError::Permanent(e) => PipelineError::Analysis(e),
        }
    }
}
