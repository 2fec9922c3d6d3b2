//! Fixtures and a harness wiring an ingestion cycle to in-memory fakes.

use super::mocks::{FaultyObjectStore, RecordingDatasetService, ScriptedJobService};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tasker_ingest::checkpoint::ParameterCheckpointStore;
use tasker_ingest::config::{DatasetConfig, JobConfig, OutputConfig, PipelineConfig};
use tasker_ingest::models::PathParameter;
use tasker_ingest::orchestration::{CycleServices, IngestionCycle};
use tasker_ingest::services::{FixedClock, InMemoryParameterStore, ParameterStore};

pub const DATASET: &str = "weather-raw";
pub const JOB: &str = "weather-transform";
pub const OUTPUT_BUCKET: &str = "processed-data";
pub const CHECKPOINT_PARAMETER: &str = "/tasker-ingest/last-execution/weather-raw";

pub fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        dataset: DatasetConfig {
            name: DATASET.to_string(),
            raw_bucket: "raw-data".to_string(),
            raw_key_pattern: "weather/{sensor_id}/{ingestion_date}/<.*>.csv".to_string(),
            path_parameters: vec![
                PathParameter::new("sensor_id"),
                PathParameter::new("ingestion_date").without_column(),
            ],
        },
        job: JobConfig {
            name: JOB.to_string(),
            ..JobConfig::default()
        },
        output: OutputConfig {
            bucket: OUTPUT_BUCKET.to_string(),
            ..OutputConfig::default()
        },
        ..PipelineConfig::default()
    }
}

/// Instant the cycle under test begins
pub fn execution_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 30, 2, 0, 0).unwrap()
}

pub fn previous_checkpoint() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap()
}

/// An ingestion cycle plus handles on every fake it talks to
pub struct CycleHarness {
    pub config: PipelineConfig,
    pub parameters: Arc<dyn ParameterStore>,
    pub memory_parameters: Arc<InMemoryParameterStore>,
    pub datasets: Arc<RecordingDatasetService>,
    pub jobs: Arc<ScriptedJobService>,
    pub objects: Arc<FaultyObjectStore>,
    pub now: DateTime<Utc>,
}

impl CycleHarness {
    pub fn new(jobs: ScriptedJobService) -> Self {
        let memory_parameters = Arc::new(InMemoryParameterStore::new());
        Self {
            config: pipeline_config(),
            parameters: memory_parameters.clone(),
            memory_parameters,
            datasets: Arc::new(RecordingDatasetService::new()),
            jobs: Arc::new(jobs),
            objects: Arc::new(FaultyObjectStore::new()),
            now: execution_start(),
        }
    }

    pub fn with_checkpoint(mut self, at: DateTime<Utc>) -> Self {
        let value = at.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true);
        self.memory_parameters = Arc::new(InMemoryParameterStore::with_value(
            CHECKPOINT_PARAMETER,
            value,
        ));
        self.parameters = self.memory_parameters.clone();
        self
    }

    pub fn with_raw_checkpoint(mut self, value: &str) -> Self {
        self.memory_parameters = Arc::new(InMemoryParameterStore::with_value(
            CHECKPOINT_PARAMETER,
            value,
        ));
        self.parameters = self.memory_parameters.clone();
        self
    }

    /// Replace the parameter backend, e.g. with a failing one
    pub fn with_parameters(mut self, parameters: Arc<dyn ParameterStore>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_objects(mut self, objects: FaultyObjectStore) -> Self {
        self.objects = Arc::new(objects);
        self
    }

    /// Objects under the job's temporary prefix
    pub fn with_output(self, keys: &[&str]) -> Self {
        self.with_objects(FaultyObjectStore::new().with_objects(OUTPUT_BUCKET, keys))
    }

    pub fn with_datasets(mut self, datasets: RecordingDatasetService) -> Self {
        self.datasets = Arc::new(datasets);
        self
    }

    pub fn configure(mut self, change: impl FnOnce(&mut PipelineConfig)) -> Self {
        change(&mut self.config);
        self
    }

    pub fn cycle(&self) -> IngestionCycle {
        let services = CycleServices {
            checkpoints: Arc::new(ParameterCheckpointStore::new(
                self.parameters.clone(),
                self.config.checkpoint.parameter_prefix.clone(),
            )),
            datasets: self.datasets.clone(),
            jobs: self.jobs.clone(),
            objects: self.objects.clone(),
            clock: Arc::new(FixedClock::new(self.now)),
        };
        IngestionCycle::new(self.config.clone(), services).expect("valid test configuration")
    }

    /// Raw checkpoint value in the in-memory parameter store
    pub fn stored_checkpoint(&self) -> Option<String> {
        self.memory_parameters.value(CHECKPOINT_PARAMETER)
    }

    pub fn output_keys(&self) -> Vec<String> {
        self.objects.store().keys(OUTPUT_BUCKET)
    }
}
