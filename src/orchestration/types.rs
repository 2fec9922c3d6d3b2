//! Results of an ingestion cycle.

use crate::error::{ErrorKind, IngestError};
use crate::models::{Checkpoint, ExecutionWindow, JobRun, RelocationSummary};
use crate::state_machine::CycleStage;
use serde::Serialize;
use uuid::Uuid;

/// Everything a successful cycle did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub execution_id: Uuid,
    pub dataset_id: String,
    pub window: ExecutionWindow,
    pub job_run: JobRun,
    pub relocation: RelocationSummary,
    pub checkpoint: Checkpoint,
}

/// Where and why a cycle stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleFailure {
    pub execution_id: Uuid,
    pub dataset_id: String,
    pub stage: CycleStage,
    pub kind: ErrorKind,
    /// Human-readable cause
    pub cause: String,
    /// Last known state of the submitted run, if one was submitted
    pub job_run: Option<JobRun>,
}

impl CycleFailure {
    pub fn from_error(
        execution_id: Uuid,
        dataset_id: impl Into<String>,
        stage: CycleStage,
        error: &IngestError,
        job_run: Option<JobRun>,
    ) -> Self {
        Self {
            execution_id,
            dataset_id: dataset_id.into(),
            stage,
            kind: error.kind(),
            cause: error.to_string(),
            job_run,
        }
    }
}

/// Terminal outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Succeeded(CycleReport),
    Failed(CycleFailure),
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Succeeded(report) => Some(report),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&CycleFailure> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    pub fn execution_id(&self) -> Uuid {
        match self {
            Self::Succeeded(report) => report.execution_id,
            Self::Failed(failure) => failure.execution_id,
        }
    }
}

/// Stage and run reached so far; survives a timeout that drops the cycle
#[derive(Debug, Clone, Default)]
pub(crate) struct CycleProgress {
    pub stage: CycleStage,
    pub job_run: Option<JobRun>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobRunRequest;
    use crate::services::ServiceError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_failed_outcome_serializes_with_status_tag() {
        let error = IngestError::infrastructure(
            "update_dataset",
            ServiceError::unavailable("datasets", "connection refused"),
        );
        let outcome = CycleOutcome::Failed(CycleFailure::from_error(
            Uuid::nil(),
            "weather-raw",
            CycleStage::UpdatingDataset,
            &error,
            None,
        ));

        let rendered = serde_json::to_value(&outcome).unwrap();
        assert_eq!(rendered["status"], "failed");
        assert_eq!(rendered["stage"], "updating_dataset");
        assert_eq!(rendered["kind"], "infrastructure");
        assert!(rendered["cause"]
            .as_str()
            .unwrap()
            .starts_with("update_dataset failed"));
        assert!(!outcome.is_success());
        assert!(outcome.report().is_none());
    }

    #[test]
    fn test_succeeded_outcome_serializes_window_and_run() {
        let window = ExecutionWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 30, 2, 0, 0).unwrap(),
        )
        .unwrap();
        let request = JobRunRequest {
            job_name: "weather-transform".to_string(),
            window,
        };
        let report = CycleReport {
            execution_id: Uuid::nil(),
            dataset_id: "weather-raw".to_string(),
            window,
            job_run: JobRun::submitted("jr_1", &request),
            relocation: RelocationSummary::default(),
            checkpoint: Checkpoint::new("weather-raw", window.end()),
        };

        let rendered = serde_json::to_value(CycleOutcome::Succeeded(report)).unwrap();
        assert_eq!(rendered["status"], "succeeded");
        assert_eq!(rendered["job_run"]["id"], "jr_1");
        assert_eq!(rendered["job_run"]["state"], "STARTING");
        assert_eq!(rendered["window"]["start"], "2025-03-30T01:00:00Z");
    }
}
