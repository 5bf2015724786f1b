use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{HistoryError, HistoryStore};
use crate::domain::{
    CulturalNote, HistoryStatus, JobHistoryRecord, JobId, Segment, StatusUpdate, StorageKey,
    UserId,
};

const SELECT_COLUMNS: &str = r#"
    SELECT user_id, job_id, status, target_language, input_key, output_key, compact_key,
           subtitle_key, words_localized, size_mb, error, segments, cultural_report, created_at, updated_at
    FROM job_history
"#;

/// History keyed by `(user_id, created_at)`. Updates and deletes match on
/// `job_id` within the caller's rows.
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), HistoryError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| HistoryError::ConnectionFailed(e.to_string()))
    }
}

fn query_failed(e: sqlx::Error) -> HistoryError {
    HistoryError::QueryFailed(e.to_string())
}

fn not_found(job_id: JobId) -> HistoryError {
    HistoryError::NotFound(format!("job {} in caller history", job_id))
}

fn record_from_row(row: &PgRow) -> Result<JobHistoryRecord, HistoryError> {
    let user_id: String = row.try_get("user_id").map_err(query_failed)?;
    let status: String = row.try_get("status").map_err(query_failed)?;
    let job_id: Uuid = row.try_get("job_id").map_err(query_failed)?;
    let words_localized: Option<i64> = row.try_get("words_localized").map_err(query_failed)?;
    let segments: Json<Vec<Segment>> = row
        .try_get("segments")
        .map_err(|e| HistoryError::Serialization(e.to_string()))?;
    let cultural_report: Json<Vec<CulturalNote>> = row
        .try_get("cultural_report")
        .map_err(|e| HistoryError::Serialization(e.to_string()))?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_failed)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(query_failed)?;

    let optional_key = |column: &str| -> Result<Option<StorageKey>, HistoryError> {
        let value: Option<String> = row.try_get(column).map_err(query_failed)?;
        Ok(value.map(StorageKey::from_raw))
    };

    Ok(JobHistoryRecord {
        user_id: UserId::new(user_id)
            .ok_or_else(|| HistoryError::Serialization("empty user_id".to_string()))?,
        job_id: JobId::from_uuid(job_id),
        status: status.parse().map_err(HistoryError::Serialization)?,
        target_language: row.try_get("target_language").map_err(query_failed)?,
        input_key: StorageKey::from_raw(row.try_get::<String, _>("input_key").map_err(query_failed)?),
        output_key: optional_key("output_key")?,
        compact_key: optional_key("compact_key")?,
        subtitle_key: optional_key("subtitle_key")?,
        words_localized: words_localized.map(|w| w.max(0) as u64),
        size_mb: row.try_get("size_mb").map_err(query_failed)?,
        error: row.try_get("error").map_err(query_failed)?,
        segments: segments.0,
        cultural_report: cultural_report.0,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    #[instrument(skip(self, record), fields(job_id = %record.job_id))]
    async fn save_draft(&self, record: &JobHistoryRecord) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            INSERT INTO job_history (user_id, created_at, job_id, status, target_language,
                                     input_key, segments, cultural_report, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.user_id.as_str())
        .bind(record.created_at)
        .bind(record.job_id.as_uuid())
        .bind(record.status.as_str())
        .bind(&record.target_language)
        .bind(record.input_key.as_str())
        .bind(Json(&record.segments))
        .bind(Json(&record.cultural_report))
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self, user_id, segments), fields(job_id = %job_id, segments = segments.len()))]
    async fn update_segments(
        &self,
        user_id: &UserId,
        job_id: JobId,
        segments: &[Segment],
        status: Option<HistoryStatus>,
    ) -> Result<(), HistoryError> {
        let result = sqlx::query(
            r#"
            UPDATE job_history
            SET segments = $1, status = COALESCE($2, status), updated_at = $3
            WHERE user_id = $4 AND job_id = $5
            "#,
        )
        .bind(Json(segments))
        .bind(status.map(|s| s.as_str()))
        .bind(Utc::now())
        .bind(user_id.as_str())
        .bind(job_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        if result.rows_affected() == 0 {
            return Err(not_found(job_id));
        }
        Ok(())
    }

    #[instrument(skip(self, user_id, update), fields(job_id = %job_id, status = %update.status))]
    async fn update_status(
        &self,
        user_id: &UserId,
        job_id: JobId,
        update: &StatusUpdate,
    ) -> Result<(), HistoryError> {
        let result = sqlx::query(
            r#"
            UPDATE job_history
            SET status = $1,
                output_key = COALESCE($2, output_key),
                compact_key = COALESCE($3, compact_key),
                subtitle_key = COALESCE($4, subtitle_key),
                words_localized = COALESCE($5, words_localized),
                size_mb = COALESCE($6, size_mb),
                error = $7,
                updated_at = $8
            WHERE user_id = $9 AND job_id = $10
            "#,
        )
        .bind(update.status.as_str())
        .bind(update.output_key.as_ref().map(|k| k.as_str()))
        .bind(update.compact_key.as_ref().map(|k| k.as_str()))
        .bind(update.subtitle_key.as_ref().map(|k| k.as_str()))
        .bind(update.words_localized.map(|w| w as i64))
        .bind(update.size_mb)
        .bind(update.error.as_deref())
        .bind(Utc::now())
        .bind(user_id.as_str())
        .bind(job_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        if result.rows_affected() == 0 {
            return Err(not_found(job_id));
        }
        Ok(())
    }

    #[instrument(skip(self, user_id))]
    async fn get_history(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<JobHistoryRecord>, HistoryError> {
        let query = format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id.as_str())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(query_failed)?;

        rows.iter().map(record_from_row).collect()
    }

    #[instrument(skip(self, user_id), fields(job_id = %job_id))]
    async fn delete_job(&self, user_id: &UserId, job_id: JobId) -> Result<(), HistoryError> {
        let result = sqlx::query("DELETE FROM job_history WHERE user_id = $1 AND job_id = $2")
            .bind(user_id.as_str())
            .bind(job_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;

        if result.rows_affected() == 0 {
            return Err(not_found(job_id));
        }
        Ok(())
    }
}
