//! Durable per-dataset checkpoint storage.

use crate::error::{IngestError, Result};
use crate::models::Checkpoint;
use crate::services::ParameterStore;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Read and write the last fully processed instant of a dataset
#[async_trait]
pub trait CheckpointStore: Send + Sync + fmt::Debug {
    /// `Ok(None)` means the dataset has never completed a cycle.
    ///
    /// A read failure is always an error and never reported as absent.
    async fn get(&self, dataset_id: &str) -> Result<Option<Checkpoint>>;

    async fn set(&self, checkpoint: &Checkpoint) -> Result<()>;
}

/// Checkpoints kept as RFC 3339 values in a parameter service, one parameter
/// per dataset named `<prefix>/<dataset_id>`
#[derive(Debug, Clone)]
pub struct ParameterCheckpointStore {
    parameters: Arc<dyn ParameterStore>,
    prefix: String,
}

impl ParameterCheckpointStore {
    pub fn new(parameters: Arc<dyn ParameterStore>, prefix: impl Into<String>) -> Self {
        Self {
            parameters,
            prefix: prefix.into(),
        }
    }

    pub fn parameter_name(&self, dataset_id: &str) -> String {
        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() {
            dataset_id.to_string()
        } else {
            format!("{prefix}/{dataset_id}")
        }
    }
}

#[async_trait]
impl CheckpointStore for ParameterCheckpointStore {
    async fn get(&self, dataset_id: &str) -> Result<Option<Checkpoint>> {
        let name = self.parameter_name(dataset_id);
        let value = self
            .parameters
            .get_parameter(&name)
            .await
            .map_err(|e| IngestError::infrastructure("get_parameter", e))?;

        match value {
            None => {
                debug!(dataset_id = %dataset_id, parameter = %name, "No checkpoint stored");
                Ok(None)
            }
            Some(value) => Ok(Some(Checkpoint::decode_value(dataset_id, &value)?)),
        }
    }

    async fn set(&self, checkpoint: &Checkpoint) -> Result<()> {
        let name = self.parameter_name(&checkpoint.dataset_id);
        self.parameters
            .put_parameter(&name, &checkpoint.encode_value())
            .await
            .map_err(|e| IngestError::infrastructure("put_parameter", e))
    }
}
