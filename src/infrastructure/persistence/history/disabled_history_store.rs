use async_trait::async_trait;

use crate::application::ports::{HistoryError, HistoryStore};
use crate::domain::{HistoryStatus, JobHistoryRecord, JobId, Segment, StatusUpdate, UserId};

pub struct DisabledHistoryStore;

#[async_trait]
impl HistoryStore for DisabledHistoryStore {
    fn is_configured(&self) -> bool {
        false
    }

    async fn save_draft(&self, _record: &JobHistoryRecord) -> Result<(), HistoryError> {
        Err(HistoryError::NotConfigured)
    }

    async fn update_segments(
        &self,
        _user_id: &UserId,
        _job_id: JobId,
        _segments: &[Segment],
        _status: Option<HistoryStatus>,
    ) -> Result<(), HistoryError> {
        Err(HistoryError::NotConfigured)
    }

    async fn update_status(
        &self,
        _user_id: &UserId,
        _job_id: JobId,
        _update: &StatusUpdate,
    ) -> Result<(), HistoryError> {
        Err(HistoryError::NotConfigured)
    }

    async fn get_history(
        &self,
        _user_id: &UserId,
        _limit: usize,
    ) -> Result<Vec<JobHistoryRecord>, HistoryError> {
        Err(HistoryError::NotConfigured)
    }

    async fn delete_job(&self, _user_id: &UserId, _job_id: JobId) -> Result<(), HistoryError> {
        Err(HistoryError::NotConfigured)
    }
}
