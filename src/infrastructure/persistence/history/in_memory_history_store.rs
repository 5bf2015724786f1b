use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{HistoryError, HistoryStore};
use crate::domain::{HistoryStatus, JobHistoryRecord, JobId, Segment, StatusUpdate, UserId};

/// History held per user in memory. Lost on restart.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    partitions: RwLock<HashMap<UserId, Vec<JobHistoryRecord>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(job_id: JobId) -> HistoryError {
    HistoryError::NotFound(format!("job {} in caller history", job_id))
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn save_draft(&self, record: &JobHistoryRecord) -> Result<(), HistoryError> {
        self.partitions
            .write()
            .await
            .entry(record.user_id.clone())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn update_segments(
        &self,
        user_id: &UserId,
        job_id: JobId,
        segments: &[Segment],
        status: Option<HistoryStatus>,
    ) -> Result<(), HistoryError> {
        let mut partitions = self.partitions.write().await;
        let record = partitions
            .get_mut(user_id)
            .and_then(|records| records.iter_mut().find(|r| r.job_id == job_id))
            .ok_or_else(|| not_found(job_id))?;

        record.segments = segments.to_vec();
        if let Some(status) = status {
            record.status = status;
        }
        record.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn update_status(
        &self,
        user_id: &UserId,
        job_id: JobId,
        update: &StatusUpdate,
    ) -> Result<(), HistoryError> {
        let mut partitions = self.partitions.write().await;
        let record = partitions
            .get_mut(user_id)
            .and_then(|records| records.iter_mut().find(|r| r.job_id == job_id))
            .ok_or_else(|| not_found(job_id))?;

        record.apply(update);
        Ok(())
    }

    async fn get_history(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<JobHistoryRecord>, HistoryError> {
        let partitions = self.partitions.read().await;
        let mut records = partitions.get(user_id).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn delete_job(&self, user_id: &UserId, job_id: JobId) -> Result<(), HistoryError> {
        let mut partitions = self.partitions.write().await;
        let records = partitions.get_mut(user_id).ok_or_else(|| not_found(job_id))?;
        let before = records.len();
        records.retain(|r| r.job_id != job_id);
        if records.len() == before {
            return Err(not_found(job_id));
        }
        Ok(())
    }
}
