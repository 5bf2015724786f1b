use chrono::{DateTime, Utc};

use super::{JobId, JobStatus, PhaseResult, StorageKey, UserId};

/// One end-to-end localization run for one input video and target language.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub input_reference: StorageKey,
    pub target_language: String,
    pub owner: Option<UserId>,
    pub output_reference: Option<StorageKey>,
    pub error: Option<String>,
    pub result: Option<PhaseResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(input_reference: StorageKey, target_language: String, owner: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            progress: 0,
            message: "Job created".to_string(),
            input_reference,
            target_language,
            owner,
            output_reference: None,
            error: None,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies one state-machine step.
    ///
    /// Progress may not go backwards within a phase; entering `Pending`
    /// starts a new phase and clears the previous outcome.
    pub fn apply(&mut self, transition: JobTransition) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(transition.status) {
            return Err(TransitionError::InvalidEdge {
                from: self.status,
                to: transition.status,
            });
        }

        if transition.status == JobStatus::Pending {
            self.output_reference = None;
            self.error = None;
            self.result = None;
        } else if transition.progress < self.progress {
            return Err(TransitionError::ProgressRegression {
                from: self.progress,
                to: transition.progress,
            });
        }

        self.status = transition.status;
        self.progress = transition.progress;
        self.message = transition.message;
        if let Some(output) = transition.output_reference {
            self.output_reference = Some(output);
        }
        if let Some(result) = transition.result {
            self.result = Some(result);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the job to `Failed`, keeping its last progress value.
    pub fn fail(&mut self, error: &str) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(JobStatus::Failed) {
            return Err(TransitionError::InvalidEdge {
                from: self.status,
                to: JobStatus::Failed,
            });
        }

        self.status = JobStatus::Failed;
        self.error = Some(error.to_string());
        self.message = format!("Processing failed: {}", error);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether `caller` may act on this job. Anonymous jobs are open to all.
    pub fn is_accessible_by(&self, caller: Option<&UserId>) -> bool {
        match &self.owner {
            Some(owner) => caller == Some(owner),
            None => true,
        }
    }
}

/// A single step of the job state machine as requested by the owning task.
#[derive(Debug, Clone)]
pub struct JobTransition {
    pub status: JobStatus,
    pub progress: u8,
    pub message: String,
    pub output_reference: Option<StorageKey>,
    pub result: Option<PhaseResult>,
}

impl JobTransition {
    pub fn new(status: JobStatus, progress: u8, message: impl Into<String>) -> Self {
        Self {
            status,
            progress: progress.min(100),
            message: message.into(),
            output_reference: None,
            result: None,
        }
    }

    pub fn with_output(mut self, output_reference: StorageKey) -> Self {
        self.output_reference = Some(output_reference);
        self
    }

    pub fn with_result(mut self, result: PhaseResult) -> Self {
        self.result = Some(result);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("invalid transition from {from} to {to}")]
    InvalidEdge { from: JobStatus, to: JobStatus },
    #[error("progress cannot go backwards from {from} to {to}")]
    ProgressRegression { from: u8, to: u8 },
}
