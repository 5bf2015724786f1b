use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Uploading,
    Analyzing,
    GeneratingAudio,
    Stitching,
    Complete,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Uploading => "uploading",
            JobStatus::Analyzing => "analyzing",
            JobStatus::GeneratingAudio => "generating_audio",
            JobStatus::Stitching => "stitching",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }

    /// Edges of the job state machine.
    ///
    /// Staying in the same running state is allowed so a step can report
    /// progress. `Pending` is the only way out of a terminal state and marks
    /// the start of a new phase; a job already pending cannot be re-queued.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;

        match (*self, next) {
            (current, Failed) => !current.is_terminal(),
            (Complete | Failed, Pending) => true,
            (_, Pending) => false,
            (current, same) if current == same => !current.is_terminal(),
            (Pending, Uploading) => true,
            (Uploading, Analyzing | GeneratingAudio) => true,
            (Analyzing, Complete) => true,
            (GeneratingAudio, Stitching) => true,
            (Stitching, Complete) => true,
            _ => false,
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "uploading" => Ok(JobStatus::Uploading),
            "analyzing" => Ok(JobStatus::Analyzing),
            "generating_audio" => Ok(JobStatus::GeneratingAudio),
            "stitching" => Ok(JobStatus::Stitching),
            "complete" => Ok(JobStatus::Complete),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
