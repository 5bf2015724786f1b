use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{JobRegistry, RegistryError};
use crate::domain::{Job, JobId, JobStatus, JobTransition, StorageKey, UserId};

/// Process-local registry. Jobs live until the process exits.
#[derive(Default)]
pub struct InMemoryJobRegistry {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl JobRegistry for InMemoryJobRegistry {
    async fn create(
        &self,
        input_reference: StorageKey,
        target_language: &str,
        owner: Option<UserId>,
    ) -> Result<JobId, RegistryError> {
        let job = Job::new(input_reference, target_language.to_string(), owner);
        let id = job.id;
        self.jobs.write().await.insert(id, job);
        Ok(id)
    }

    async fn transition(&self, id: JobId, transition: JobTransition) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        job.apply(transition)?;
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        job.fail(error)?;
        Ok(())
    }

    async fn restart(&self, id: JobId, message: &str) -> Result<Job, RegistryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        if !job.status.is_terminal() {
            return Err(RegistryError::Busy(id));
        }

        let previous = job.clone();
        job.apply(JobTransition::new(JobStatus::Pending, 0, message))?;
        Ok(previous)
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, RegistryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }
}
