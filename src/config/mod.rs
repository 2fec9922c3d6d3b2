//! # Configuration
//!
//! Typed pipeline configuration. Every section falls back to its defaults
//! when absent, so a file only needs the deployment-specific values: dataset
//! and job names, buckets, and the raw key pattern.
//!
//! ```toml
//! [dataset]
//! name = "weather-raw"
//! raw_bucket = "raw-data"
//! raw_key_pattern = "weather/{sensor_id}/{ingestion_date}/<.*>.csv"
//!
//! [[dataset.path_parameters]]
//! name = "sensor_id"
//!
//! [job]
//! name = "weather-transform"
//!
//! [output]
//! bucket = "processed-data"
//! ```

pub mod error;
pub mod loader;

use crate::constants::defaults;
use crate::models::{InputLocation, PathParameter};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Root configuration of one ingestion pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dataset: DatasetConfig,
    pub job: JobConfig,
    pub output: OutputConfig,
    pub checkpoint: CheckpointConfig,
    pub workflow: WorkflowConfig,
}

/// Raw dataset whose definition is rescoped every cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Dataset name; also the checkpoint key
    pub name: String,
    pub raw_bucket: String,
    /// Key pattern with `{parameter}` segments
    pub raw_key_pattern: String,
    pub path_parameters: Vec<PathParameter>,
}

impl DatasetConfig {
    pub fn input_location(&self) -> InputLocation {
        InputLocation {
            bucket: self.raw_bucket.clone(),
            key: self.raw_key_pattern.clone(),
        }
    }
}

/// Transform job and how its completion is observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub name: String,
    pub poll_interval_seconds: u64,
    /// Attempts per status check, counting the first
    pub describe_max_attempts: u32,
    pub describe_retry_delay_seconds: u64,
    /// Ask the job service to stop the run when the cycle times out
    pub cancel_on_timeout: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            poll_interval_seconds: defaults::POLL_INTERVAL_SECONDS,
            describe_max_attempts: defaults::DESCRIBE_MAX_ATTEMPTS,
            describe_retry_delay_seconds: defaults::DESCRIBE_RETRY_DELAY_SECONDS,
            cancel_on_timeout: false,
        }
    }
}

impl JobConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn describe_retry_delay(&self) -> Duration {
        Duration::from_secs(self.describe_retry_delay_seconds)
    }
}

/// Where the job writes and where relocated files end up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub bucket: String,
    pub temporary_prefix: String,
    pub destination_prefix: String,
    pub file_extension: String,
    pub dropped_segments: usize,
    pub max_concurrent_relocations: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            temporary_prefix: defaults::TEMPORARY_PREFIX.to_string(),
            destination_prefix: defaults::DESTINATION_PREFIX.to_string(),
            file_extension: defaults::FILE_EXTENSION.to_string(),
            dropped_segments: defaults::DROPPED_SEGMENTS,
            max_concurrent_relocations: defaults::MAX_CONCURRENT_RELOCATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub parameter_prefix: String,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            parameter_prefix: defaults::CHECKPOINT_PARAMETER_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Budget for one whole cycle
    pub timeout_minutes: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: defaults::WORKFLOW_TIMEOUT_MINUTES,
        }
    }
}

impl WorkflowConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }
}

fn require(value: &str, field: &str, context: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::missing_required_field(field, context));
    }
    Ok(())
}

/// Non-empty `/`-separated segments of a key prefix
fn prefix_segments(prefix: &str) -> Vec<&str> {
    prefix.split('/').filter(|segment| !segment.is_empty()).collect()
}

impl PipelineConfig {
    /// Check required fields and numeric bounds
    pub fn validate(&self) -> ConfigResult<()> {
        require(&self.dataset.name, "dataset.name", "dataset configuration")?;
        require(
            &self.dataset.raw_bucket,
            "dataset.raw_bucket",
            "dataset configuration",
        )?;
        require(
            &self.dataset.raw_key_pattern,
            "dataset.raw_key_pattern",
            "dataset configuration",
        )?;
        for parameter in &self.dataset.path_parameters {
            require(
                &parameter.name,
                "dataset.path_parameters.name",
                "dataset configuration",
            )?;
        }

        require(&self.job.name, "job.name", "job configuration")?;
        if self.job.poll_interval_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "job.poll_interval_seconds",
                "0",
                "poll interval must be greater than 0",
            ));
        }
        if self.job.describe_max_attempts == 0 {
            return Err(ConfigurationError::invalid_value(
                "job.describe_max_attempts",
                "0",
                "at least one attempt is required",
            ));
        }

        require(&self.output.bucket, "output.bucket", "output configuration")?;
        require(
            &self.output.temporary_prefix,
            "output.temporary_prefix",
            "output configuration",
        )?;
        require(
            &self.output.file_extension,
            "output.file_extension",
            "output configuration",
        )?;
        let temporary = prefix_segments(&self.output.temporary_prefix);
        if prefix_segments(&self.output.destination_prefix).starts_with(&temporary) {
            return Err(ConfigurationError::invalid_value(
                "output.destination_prefix",
                self.output.destination_prefix.clone(),
                "destination prefix must not be the temporary prefix or lie under it",
            ));
        }
        if self.output.max_concurrent_relocations == 0 {
            return Err(ConfigurationError::invalid_value(
                "output.max_concurrent_relocations",
                "0",
                "concurrency must be greater than 0",
            ));
        }

        require(
            &self.checkpoint.parameter_prefix,
            "checkpoint.parameter_prefix",
            "checkpoint configuration",
        )?;

        if self.workflow.timeout_minutes == 0 {
            return Err(ConfigurationError::invalid_value(
                "workflow.timeout_minutes",
                "0",
                "timeout must be greater than 0",
            ));
        }
        if self.job.poll_interval() >= self.workflow.timeout() {
            return Err(ConfigurationError::invalid_value(
                "job.poll_interval_seconds",
                self.job.poll_interval_seconds.to_string(),
                "poll interval must be shorter than the workflow timeout",
            ));
        }

        Ok(())
    }
}
