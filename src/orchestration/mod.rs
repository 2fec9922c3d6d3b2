//! # Orchestration
//!
//! The ingestion cycle and the stages it drives.
//!
//! ## Core Components
//!
//! - **IngestionCycle**: runs one cycle end to end under the workflow timeout
//! - **JobPoller**: submits the transform job and polls it to a terminal state
//! - **PostProcessor**: relocates the job's output with copy-then-delete
//!
//! Checkpoint reads and commits live in [`crate::checkpoint`].

pub mod ingestion_cycle;
pub mod job_poller;
pub mod post_processor;
pub mod types;

pub use ingestion_cycle::{CycleServices, IngestionCycle};
pub use job_poller::JobPoller;
pub use post_processor::{PostProcessor, RelocationRequest, StageResponse};
pub use types::{CycleFailure, CycleOutcome, CycleReport};
