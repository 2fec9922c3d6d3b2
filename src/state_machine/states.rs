use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;

/// Run state reported by the transform job service.
///
/// Any value outside the known vocabulary is kept verbatim in
/// [`JobState::Unknown`] and treated as a terminal failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    /// Job accepted, not yet running
    Starting,
    /// Queued for capacity
    Waiting,
    /// Actively processing
    Running,
    /// Cancellation in progress
    Stopping,
    /// Completed normally
    Succeeded,
    /// Completed with an error
    Failed,
    /// Exceeded the job's own time limit
    Timeout,
    /// Cancelled
    Stopped,
    /// State outside the known vocabulary
    Unknown(String),
}

/// What the poller does after observing a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollAction {
    /// Sleep one interval and check again
    Wait,
    /// Hand off to the post-processor
    Proceed,
    /// End the cycle with a job failure
    Fail,
}

impl JobState {
    /// Decision table for a single observation
    pub fn poll_action(&self) -> PollAction {
        match self {
            Self::Starting | Self::Waiting | Self::Running | Self::Stopping => PollAction::Wait,
            Self::Succeeded => PollAction::Proceed,
            Self::Failed | Self::Timeout | Self::Stopped | Self::Unknown(_) => PollAction::Fail,
        }
    }

    /// Check if this is a terminal state (no further transitions occur)
    pub fn is_terminal(&self) -> bool {
        self.poll_action() != PollAction::Wait
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Starting => "STARTING",
            Self::Waiting => "WAITING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Stopped => "STOPPED",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for JobState {
    fn from(value: &str) -> Self {
        match value {
            "STARTING" => Self::Starting,
            "WAITING" => Self::Waiting,
            "RUNNING" => Self::Running,
            "STOPPING" => Self::Stopping,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "TIMEOUT" => Self::Timeout,
            "STOPPED" => Self::Stopped,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for JobState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<JobState> for String {
    fn from(value: JobState) -> Self {
        value.as_str().to_string()
    }
}

/// Stage of an ingestion cycle, in execution order
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CycleStage {
    #[default]
    ReadingCheckpoint,
    ComputingWindow,
    UpdatingDataset,
    SubmittingJob,
    AwaitingJob,
    PostProcessing,
    Committing,
    Completed,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadingCheckpoint => write!(f, "reading_checkpoint"),
            Self::ComputingWindow => write!(f, "computing_window"),
            Self::UpdatingDataset => write!(f, "updating_dataset"),
            Self::SubmittingJob => write!(f, "submitting_job"),
            Self::AwaitingJob => write!(f, "awaiting_job"),
            Self::PostProcessing => write!(f, "post_processing"),
            Self::Committing => write!(f, "committing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}
