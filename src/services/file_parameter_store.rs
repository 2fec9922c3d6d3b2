//! # File-Backed Parameter Store
//!
//! Durable [`ParameterStore`] that keeps all parameters in a single JSON
//! document. Every write lands in a temporary file in the same directory and
//! is renamed over the target, so a concurrent reader sees either the old or
//! the new document and never a partial one.

use crate::services::errors::{ServiceError, ServiceResult};
use crate::services::traits::ParameterStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

const SERVICE: &str = "parameter_store";

#[derive(Debug)]
pub struct FileParameterStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileParameterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ServiceResult<BTreeMap<String, String>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ServiceError::unavailable(
                    SERVICE,
                    format!("failed to read {}: {e}", self.path.display()),
                ))
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            ServiceError::rejected(
                SERVICE,
                format!("parameter file {} is corrupt: {e}", self.path.display()),
            )
        })
    }

    fn persist(path: &Path, parameters: &BTreeMap<String, String>) -> ServiceResult<()> {
        let io_error = |e: std::io::Error| {
            ServiceError::unavailable(
                SERVICE,
                format!("failed to write {}: {e}", path.display()),
            )
        };

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&directory).map_err(io_error)?;

        let serialized = serde_json::to_vec_pretty(parameters)
            .map_err(|e| ServiceError::rejected(SERVICE, format!("serialization failed: {e}")))?;

        let mut staged = tempfile::NamedTempFile::new_in(&directory).map_err(io_error)?;
        staged.write_all(&serialized).map_err(io_error)?;
        staged.as_file().sync_all().map_err(io_error)?;
        staged.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl ParameterStore for FileParameterStore {
    async fn get_parameter(&self, name: &str) -> ServiceResult<Option<String>> {
        Ok(self.load().await?.remove(name))
    }

    async fn put_parameter(&self, name: &str, value: &str) -> ServiceResult<()> {
        if name.is_empty() {
            return Err(ServiceError::rejected(
                SERVICE,
                "parameter name must not be empty",
            ));
        }

        let _guard = self.write_lock.lock().await;
        let mut parameters = self.load().await?;
        parameters.insert(name.to_string(), value.to_string());

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::persist(&path, &parameters))
            .await
            .map_err(|e| ServiceError::unavailable(SERVICE, format!("write task failed: {e}")))??;

        debug!(parameter = %name, path = %self.path.display(), "Parameter persisted");
        Ok(())
    }
}
