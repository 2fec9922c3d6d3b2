//! # Collaborator Traits
//!
//! Interfaces for the external services the ingestion cycle drives. Every
//! collaborator is injected as an `Arc<dyn Trait>` so a cycle can run against
//! cloud clients in production and against in-memory fakes in tests.

use crate::models::{DatasetUpdate, JobRunRequest, JobRunStatus};
use crate::services::errors::ServiceResult;
use async_trait::async_trait;
use std::fmt;

/// Key/value parameter service holding durable checkpoint values
#[async_trait]
pub trait ParameterStore: Send + Sync + fmt::Debug {
    /// Read a parameter. `Ok(None)` means the parameter does not exist.
    async fn get_parameter(&self, name: &str) -> ServiceResult<Option<String>>;

    /// Create or overwrite a parameter
    async fn put_parameter(&self, name: &str, value: &str) -> ServiceResult<()>;
}

/// One page of an object listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Object keys in this page, in listing order
    pub keys: Vec<String>,
    /// Token for the next page; `None` when the listing is exhausted
    pub next_continuation_token: Option<String>,
}

/// Object storage holding the transform job's output
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    /// List one page of keys under `prefix`
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> ServiceResult<ObjectPage>;

    /// Copy an object to a new key within the same bucket
    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        destination_key: &str,
    ) -> ServiceResult<()>;

    /// Delete an object
    async fn delete_object(&self, bucket: &str, key: &str) -> ServiceResult<()>;
}

/// Batch transform job service
#[async_trait]
pub trait JobService: Send + Sync + fmt::Debug {
    /// Submit a run of the job and return its run id
    async fn start_job_run(&self, request: &JobRunRequest) -> ServiceResult<String>;

    /// Report the current state of a run
    async fn describe_job_run(&self, job_name: &str, run_id: &str) -> ServiceResult<JobRunStatus>;

    /// Request cancellation of a run
    async fn stop_job_run(&self, job_name: &str, run_id: &str) -> ServiceResult<()>;
}

/// Dataset definition service that scopes the job's input to a window
#[async_trait]
pub trait DatasetService: Send + Sync + fmt::Debug {
    async fn update_dataset(&self, update: &DatasetUpdate) -> ServiceResult<()>;
}
