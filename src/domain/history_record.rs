use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{CulturalNote, JobId, Segment, StorageKey, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryStatus {
    Processing,
    NeedsReview,
    Complete,
    Failed,
}

impl HistoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Processing => "processing",
            HistoryStatus::NeedsReview => "needs_review",
            HistoryStatus::Complete => "complete",
            HistoryStatus::Failed => "failed",
        }
    }
}

impl FromStr for HistoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(HistoryStatus::Processing),
            "needs_review" => Ok(HistoryStatus::NeedsReview),
            "complete" => Ok(HistoryStatus::Complete),
            "failed" => Ok(HistoryStatus::Failed),
            _ => Err(format!("Invalid history status: {}", s)),
        }
    }
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record of one job in a user's history.
#[derive(Debug, Clone, PartialEq)]
pub struct JobHistoryRecord {
    pub user_id: UserId,
    pub job_id: JobId,
    pub status: HistoryStatus,
    pub target_language: String,
    pub input_key: StorageKey,
    pub output_key: Option<StorageKey>,
    pub compact_key: Option<StorageKey>,
    pub subtitle_key: Option<StorageKey>,
    pub words_localized: Option<u64>,
    pub size_mb: Option<f64>,
    /// Why the last finalization failed; cleared by any later status change.
    pub error: Option<String>,
    pub segments: Vec<Segment>,
    pub cultural_report: Vec<CulturalNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobHistoryRecord {
    /// A fresh record awaiting human review of its draft segments.
    pub fn draft(
        user_id: UserId,
        job_id: JobId,
        target_language: String,
        input_key: StorageKey,
        segments: Vec<Segment>,
        cultural_report: Vec<CulturalNote>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            job_id,
            status: HistoryStatus::NeedsReview,
            target_language,
            input_key,
            output_key: None,
            compact_key: None,
            subtitle_key: None,
            words_localized: None,
            size_mb: None,
            error: None,
            segments,
            cultural_report,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn segments_count(&self) -> usize {
        self.segments.len()
    }

    pub fn apply(&mut self, update: &StatusUpdate) {
        self.status = update.status;
        if let Some(key) = &update.output_key {
            self.output_key = Some(key.clone());
        }
        if let Some(key) = &update.compact_key {
            self.compact_key = Some(key.clone());
        }
        if let Some(key) = &update.subtitle_key {
            self.subtitle_key = Some(key.clone());
        }
        if let Some(words) = update.words_localized {
            self.words_localized = Some(words);
        }
        if let Some(size) = update.size_mb {
            self.size_mb = Some(size);
        }
        self.error = update.error.clone();
        self.updated_at = Utc::now();
    }
}

/// Fields written when a job's durable status changes. `None` leaves the
/// stored value untouched, except `error`, which always replaces the
/// stored reason.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: HistoryStatus,
    pub output_key: Option<StorageKey>,
    pub compact_key: Option<StorageKey>,
    pub subtitle_key: Option<StorageKey>,
    pub words_localized: Option<u64>,
    pub size_mb: Option<f64>,
    pub error: Option<String>,
}

impl StatusUpdate {
    pub fn status(status: HistoryStatus) -> Self {
        Self {
            status,
            output_key: None,
            compact_key: None,
            subtitle_key: None,
            words_localized: None,
            size_mb: None,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::status(HistoryStatus::Failed)
        }
    }
}
