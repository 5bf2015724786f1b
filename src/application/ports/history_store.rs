use async_trait::async_trait;

use crate::domain::{HistoryStatus, JobHistoryRecord, JobId, Segment, StatusUpdate, UserId};

/// Durable per-user job history.
///
/// Records are partitioned by user; `job_id` is not the primary key, so
/// updates and deletes locate their record with a filtered scan over the
/// caller's partition. A job outside the caller's partition is `NotFound`.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    fn is_configured(&self) -> bool {
        true
    }

    async fn save_draft(&self, record: &JobHistoryRecord) -> Result<(), HistoryError>;

    async fn update_segments(
        &self,
        user_id: &UserId,
        job_id: JobId,
        segments: &[Segment],
        status: Option<HistoryStatus>,
    ) -> Result<(), HistoryError>;

    async fn update_status(
        &self,
        user_id: &UserId,
        job_id: JobId,
        update: &StatusUpdate,
    ) -> Result<(), HistoryError>;

    /// Newest first, at most `limit` records.
    async fn get_history(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<JobHistoryRecord>, HistoryError>;

    async fn delete_job(&self, user_id: &UserId, job_id: JobId) -> Result<(), HistoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history store is not configured")]
    NotConfigured,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}
