//! # Data Model
//!
//! Values passed between the stages of an ingestion cycle.

pub mod checkpoint;
pub mod dataset;
pub mod job_run;
pub mod relocation;
pub mod window;

pub use checkpoint::Checkpoint;
pub use dataset::{DatasetUpdate, InputLocation, LastModifiedCondition, PathParameter};
pub use job_run::{JobRun, JobRunRequest, JobRunStatus};
pub use relocation::{
    RelocationFailure, RelocationRules, RelocationStep, RelocationSummary, RelocationTask,
    SkipReason,
};
pub use window::{beginning_of_time, ExecutionWindow, WindowCalculator, WindowError};
