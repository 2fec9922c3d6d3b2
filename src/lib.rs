#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Tasker Ingest
//!
//! Windowed ingestion orchestration: process newly arrived partitioned data
//! files through an external batch transform job, relocate the job's output,
//! and advance a durable per-dataset checkpoint only after the whole cycle
//! succeeded.
//!
//! ## Architecture
//!
//! ```text
//! checkpoint store -> window calculator -> dataset update
//!     -> job trigger & poller -> post-processor -> checkpoint committer
//! ```
//!
//! Each stage hands its output to the next; a failure at any stage halts the
//! cycle and the checkpoint is left where it was. External services (job
//! service, dataset definitions, object storage, parameter store) are
//! injected as trait objects.
//!
//! ## Module Organization
//!
//! - [`models`] - checkpoints, execution windows, job runs, relocation rules
//! - [`state_machine`] - job run states and the poll decision table
//! - [`checkpoint`] - checkpoint storage and the final commit
//! - [`orchestration`] - the ingestion cycle, job poller, and post-processor
//! - [`services`] - collaborator traits, paginated listing, in-memory and file-backed stores
//! - [`resilience`] - bounded retry for idempotent status checks
//! - [`config`] - layered TOML and environment configuration
//! - [`error`] - structured error handling
//! - [`logging`] - `tracing` setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasker_ingest::checkpoint::ParameterCheckpointStore;
//! use tasker_ingest::config::ConfigLoader;
//! use tasker_ingest::orchestration::{CycleServices, IngestionCycle};
//! use tasker_ingest::services::{
//!     DatasetService, FileParameterStore, JobService, ObjectStore, SystemClock,
//! };
//!
//! # async fn example(
//! #     jobs: Arc<dyn JobService>,
//! #     datasets: Arc<dyn DatasetService>,
//! #     objects: Arc<dyn ObjectStore>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! tasker_ingest::logging::init_structured_logging();
//!
//! let config = ConfigLoader::new().load_from_directory("config".as_ref())?;
//! let parameters = Arc::new(FileParameterStore::new("state/checkpoints.json"));
//! let services = CycleServices {
//!     checkpoints: Arc::new(ParameterCheckpointStore::new(
//!         parameters,
//!         config.checkpoint.parameter_prefix.clone(),
//!     )),
//!     datasets,
//!     jobs,
//!     objects,
//!     clock: Arc::new(SystemClock),
//! };
//!
//! let outcome = IngestionCycle::new(config, services)?.run().await;
//! println!("{}", serde_json::to_string(&outcome)?);
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod resilience;
pub mod services;
pub mod state_machine;

pub use checkpoint::{CheckpointCommitter, CheckpointStore, ParameterCheckpointStore};
pub use config::{ConfigLoader, ConfigurationError, PipelineConfig};
pub use error::{ErrorKind, IngestError, Result};
pub use models::{
    Checkpoint, DatasetUpdate, ExecutionWindow, JobRun, RelocationSummary, RelocationTask,
    WindowCalculator, WindowError,
};
pub use orchestration::{
    CycleFailure, CycleOutcome, CycleReport, CycleServices, IngestionCycle, JobPoller,
    PostProcessor, RelocationRequest, StageResponse,
};
pub use state_machine::{CycleStage, JobState, PollAction};
