//! # Error Types
//!
//! Every cycle failure is fail-fast: none of these errors triggers an
//! automatic re-run, and none of them lets the checkpoint advance.

use crate::config::ConfigurationError;
use crate::models::{RelocationFailure, WindowError};
use crate::services::ServiceError;
use crate::state_machine::{CycleStage, JobState, StateMachineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// A collaborator call failed (after retries, where retries apply)
    #[error("{operation} failed: {source}")]
    Infrastructure {
        operation: String,
        #[source]
        source: ServiceError,
    },

    #[error("invalid execution window: {0}")]
    InvalidWindow(#[from] WindowError),

    /// The transform job reached a non-success terminal state
    #[error("job {job_name} run {run_id} ended in state {state}{}", message_suffix(.message))]
    JobFailed {
        job_name: String,
        run_id: String,
        state: JobState,
        message: Option<String>,
    },

    /// At least one copy or delete did not complete
    #[error("{failed} of {attempted} relocations failed: {}", first_failure(.failures))]
    PartialRelocation {
        attempted: usize,
        failed: usize,
        failures: Vec<RelocationFailure>,
    },

    #[error("cycle exceeded its {}s budget during {stage}", .limit.as_secs())]
    Timeout { limit: Duration, stage: CycleStage },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

fn first_failure(failures: &[RelocationFailure]) -> String {
    match failures.first() {
        Some(failure) if failures.len() > 1 => {
            format!("{failure} (and {} more)", failures.len() - 1)
        }
        Some(failure) => failure.to_string(),
        None => "no failure details".to_string(),
    }
}

/// Coarse classification used in cycle outcomes and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Infrastructure,
    InvalidWindow,
    JobFailed,
    PartialRelocation,
    Timeout,
    Configuration,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::InvalidWindow => "invalid_window",
            Self::JobFailed => "job_failed",
            Self::PartialRelocation => "partial_relocation",
            Self::Timeout => "timeout",
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl IngestError {
    pub fn infrastructure(operation: impl Into<String>, source: ServiceError) -> Self {
        Self::Infrastructure {
            operation: operation.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Infrastructure { .. } => ErrorKind::Infrastructure,
            Self::InvalidWindow(_) => ErrorKind::InvalidWindow,
            Self::JobFailed { .. } => ErrorKind::JobFailed,
            Self::PartialRelocation { .. } => ErrorKind::PartialRelocation,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::StateMachine(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
