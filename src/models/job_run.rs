use crate::models::window::ExecutionWindow;
use crate::state_machine::JobState;
use serde::Serialize;

/// Submission of a transform job scoped to one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRunRequest {
    pub job_name: String,
    pub window: ExecutionWindow,
}

/// Status reported by the job service for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRunStatus {
    pub state: JobState,
    /// Diagnostic message attached by the service, if any
    pub message: Option<String>,
}

impl JobRunStatus {
    pub fn new(state: impl Into<JobState>) -> Self {
        Self {
            state: state.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A submitted run of the transform job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRun {
    pub id: String,
    pub job_name: String,
    pub state: JobState,
    pub dataset_window: ExecutionWindow,
    /// Number of status checks issued so far
    pub polls: u32,
}

impl JobRun {
    pub fn submitted(id: impl Into<String>, request: &JobRunRequest) -> Self {
        Self {
            id: id.into(),
            job_name: request.job_name.clone(),
            state: JobState::Starting,
            dataset_window: request.window,
            polls: 0,
        }
    }
}
