//! Substitutable collaborators with scripted behavior and call recording.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tasker_ingest::models::{DatasetUpdate, JobRunRequest, JobRunStatus};
use tasker_ingest::services::{
    DatasetService, InMemoryObjectStore, JobService, ObjectPage, ObjectStore, ParameterStore,
    ServiceError, ServiceResult,
};
use tasker_ingest::state_machine::JobState;

pub const RUN_ID: &str = "jr_0001";

/// Job service replaying a fixed sequence of status responses.
///
/// Once the script is exhausted the last successful status repeats, so a
/// script of `["RUNNING"]` models a job that never finishes.
#[derive(Debug)]
pub struct ScriptedJobService {
    script: Mutex<VecDeque<ServiceResult<JobRunStatus>>>,
    last: Mutex<JobRunStatus>,
    start_error: Option<ServiceError>,
    stop_error: Option<ServiceError>,
    submissions: Mutex<Vec<JobRunRequest>>,
    describe_calls: AtomicUsize,
    stop_calls: Mutex<Vec<String>>,
}

impl ScriptedJobService {
    pub fn new(states: &[&str]) -> Self {
        Self::with_responses(
            states
                .iter()
                .map(|state| Ok(JobRunStatus::new(*state)))
                .collect(),
        )
    }

    pub fn with_responses(responses: Vec<ServiceResult<JobRunStatus>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            last: Mutex::new(JobRunStatus::new(JobState::Running)),
            start_error: None,
            stop_error: None,
            submissions: Mutex::new(Vec::new()),
            describe_calls: AtomicUsize::new(0),
            stop_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_start(error: ServiceError) -> Self {
        Self {
            start_error: Some(error),
            ..Self::new(&[])
        }
    }

    pub fn with_stop_error(mut self, error: ServiceError) -> Self {
        self.stop_error = Some(error);
        self
    }

    pub fn submissions(&self) -> Vec<JobRunRequest> {
        self.submissions.lock().clone()
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> Vec<String> {
        self.stop_calls.lock().clone()
    }
}

#[async_trait]
impl JobService for ScriptedJobService {
    async fn start_job_run(&self, request: &JobRunRequest) -> ServiceResult<String> {
        if let Some(error) = &self.start_error {
            return Err(error.clone());
        }
        self.submissions.lock().push(request.clone());
        Ok(RUN_ID.to_string())
    }

    async fn describe_job_run(&self, _job_name: &str, run_id: &str) -> ServiceResult<JobRunStatus> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if run_id != RUN_ID {
            return Err(ServiceError::not_found("jobs", run_id));
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(Ok(status)) => {
                *self.last.lock() = status.clone();
                Ok(status)
            }
            Some(Err(error)) => Err(error),
            None => Ok(self.last.lock().clone()),
        }
    }

    async fn stop_job_run(&self, _job_name: &str, run_id: &str) -> ServiceResult<()> {
        self.stop_calls.lock().push(run_id.to_string());
        match &self.stop_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Dataset service that records every update
#[derive(Debug, Default)]
pub struct RecordingDatasetService {
    updates: Mutex<Vec<DatasetUpdate>>,
    error: Option<ServiceError>,
}

impl RecordingDatasetService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
            error: Some(error),
        }
    }

    pub fn updates(&self) -> Vec<DatasetUpdate> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl DatasetService for RecordingDatasetService {
    async fn update_dataset(&self, update: &DatasetUpdate) -> ServiceResult<()> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.updates.lock().push(update.clone());
        Ok(())
    }
}

/// Object store operation, recorded in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectOp {
    List,
    Copy { source: String, destination: String },
    Delete { key: String },
}

/// In-memory object store with per-key failure injection
#[derive(Debug, Default)]
pub struct FaultyObjectStore {
    inner: InMemoryObjectStore,
    fail_list: Option<ServiceError>,
    fail_copy: HashSet<String>,
    fail_delete: HashSet<String>,
    ops: Mutex<Vec<ObjectOp>>,
}

impl FaultyObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            inner: InMemoryObjectStore::with_page_size(page_size),
            ..Self::default()
        }
    }

    pub fn with_objects(self, bucket: &str, keys: &[&str]) -> Self {
        for key in keys {
            self.inner.put_object(bucket, key, format!("contents of {key}"));
        }
        self
    }

    pub fn failing_list(mut self, error: ServiceError) -> Self {
        self.fail_list = Some(error);
        self
    }

    /// Fail the copy whose source is `key`
    pub fn failing_copy(mut self, key: &str) -> Self {
        self.fail_copy.insert(key.to_string());
        self
    }

    pub fn failing_delete(mut self, key: &str) -> Self {
        self.fail_delete.insert(key.to_string());
        self
    }

    pub fn store(&self) -> &InMemoryObjectStore {
        &self.inner
    }

    pub fn ops(&self) -> Vec<ObjectOp> {
        self.ops.lock().clone()
    }
}

#[async_trait]
impl ObjectStore for FaultyObjectStore {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> ServiceResult<ObjectPage> {
        self.ops.lock().push(ObjectOp::List);
        if let Some(error) = &self.fail_list {
            return Err(error.clone());
        }
        self.inner
            .list_objects(bucket, prefix, continuation_token)
            .await
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        destination_key: &str,
    ) -> ServiceResult<()> {
        self.ops.lock().push(ObjectOp::Copy {
            source: source_key.to_string(),
            destination: destination_key.to_string(),
        });
        if self.fail_copy.contains(source_key) {
            return Err(ServiceError::rejected("object_store", "copy denied"));
        }
        self.inner
            .copy_object(bucket, source_key, destination_key)
            .await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> ServiceResult<()> {
        self.ops.lock().push(ObjectOp::Delete {
            key: key.to_string(),
        });
        if self.fail_delete.contains(key) {
            return Err(ServiceError::rejected("object_store", "delete denied"));
        }
        self.inner.delete_object(bucket, key).await
    }
}

/// Parameter store whose reads or writes fail or stall
#[derive(Debug, Default)]
pub struct UnreliableParameterStore {
    fail_reads: bool,
    fail_writes: bool,
    write_delay: Option<Duration>,
    writes: AtomicUsize,
}

impl UnreliableParameterStore {
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Writes succeed after `delay`
    pub fn slow_writes(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn write_attempts(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStore for UnreliableParameterStore {
    async fn get_parameter(&self, _name: &str) -> ServiceResult<Option<String>> {
        if self.fail_reads {
            return Err(ServiceError::unavailable("parameter_store", "read timed out"));
        }
        Ok(None)
    }

    async fn put_parameter(&self, _name: &str, _value: &str) -> ServiceResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes {
            return Err(ServiceError::unavailable("parameter_store", "write timed out"));
        }
        Ok(())
    }
}
