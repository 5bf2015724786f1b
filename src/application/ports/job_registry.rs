use async_trait::async_trait;

use crate::domain::{Job, JobId, JobTransition, StorageKey, TransitionError, UserId};

/// Holds live job state for status polling.
///
/// Only the task that owns a job may call `transition` or `fail` on it;
/// the registry validates each step against the state machine but does not
/// arbitrate between concurrent writers. Ownership of a new phase is taken
/// with `restart`, which is the one atomic check-and-set.
#[async_trait]
pub trait JobRegistry: Send + Sync {
    async fn create(
        &self,
        input_reference: StorageKey,
        target_language: &str,
        owner: Option<UserId>,
    ) -> Result<JobId, RegistryError>;

    async fn transition(&self, id: JobId, transition: JobTransition) -> Result<(), RegistryError>;

    async fn fail(&self, id: JobId, error: &str) -> Result<(), RegistryError>;

    /// Moves a finished job back to `Pending` at 0% and returns its state
    /// from before the restart. A job that is still running is `Busy`, so
    /// at most one caller can start the next phase.
    async fn restart(&self, id: JobId, message: &str) -> Result<Job, RegistryError>;

    async fn get(&self, id: JobId) -> Result<Option<Job>, RegistryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job {0} is still running")]
    Busy(JobId),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
