//! # Post-Processor
//!
//! Moves the transform job's output from its temporary prefix to the final
//! destination. Every qualifying object is copied, and only after the copy
//! succeeds is the source deleted. Objects are relocated concurrently and all
//! outcomes are awaited before the pass reports.

use crate::config::OutputConfig;
use crate::constants::{defaults, messages, status_codes};
use crate::error::{IngestError, Result};
use crate::models::{
    RelocationFailure, RelocationRules, RelocationStep, RelocationSummary, RelocationTask,
};
use crate::services::{list_all_keys, ObjectStore};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Stage input, in the wire shape the job pipeline hands over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationRequest {
    #[serde(rename = "destinationBucket")]
    pub destination_bucket: String,
    /// Temporary prefix the job wrote to
    #[serde(rename = "sourceKey")]
    pub source_prefix: String,
    #[serde(rename = "destinationKey")]
    pub destination_prefix: String,
}

/// Stage output: a status code plus a JSON-encoded body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl StageResponse {
    fn new(status_code: u16, body: serde_json::Value) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == status_codes::OK
    }
}

#[derive(Debug, Clone)]
pub struct PostProcessor {
    store: Arc<dyn ObjectStore>,
    extension: String,
    dropped_segments: usize,
    max_concurrency: usize,
}

impl PostProcessor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            extension: defaults::FILE_EXTENSION.to_string(),
            dropped_segments: defaults::DROPPED_SEGMENTS,
            max_concurrency: defaults::MAX_CONCURRENT_RELOCATIONS,
        }
    }

    pub fn from_config(store: Arc<dyn ObjectStore>, config: &OutputConfig) -> Self {
        Self {
            store,
            extension: config.file_extension.clone(),
            dropped_segments: config.dropped_segments,
            max_concurrency: config.max_concurrent_relocations,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Relocate everything under the request's source prefix.
    ///
    /// An empty listing is a successful no-op. Keys that do not qualify are
    /// skipped. If any copy or delete fails, the remaining tasks still run
    /// to completion and the pass fails with
    /// [`IngestError::PartialRelocation`].
    #[instrument(skip(self, request), fields(
        bucket = %request.destination_bucket,
        source_prefix = %request.source_prefix,
        destination_prefix = %request.destination_prefix,
    ))]
    pub async fn process(&self, request: &RelocationRequest) -> Result<RelocationSummary> {
        let keys: Vec<String> = list_all_keys(
            self.store.as_ref(),
            &request.destination_bucket,
            &request.source_prefix,
        )
        .try_collect()
        .await
        .map_err(|e| IngestError::infrastructure("list_objects", e))?;

        if keys.is_empty() {
            info!("{}", messages::NO_FILES_FOUND);
            return Ok(RelocationSummary::default());
        }

        let rules = RelocationRules::new(
            self.extension.as_str(),
            self.dropped_segments,
            request.destination_prefix.as_str(),
        );

        let mut tasks = Vec::with_capacity(keys.len());
        let mut skipped = 0;
        for key in &keys {
            match rules.plan(key) {
                Ok(task) => tasks.push(task),
                Err(reason) => {
                    debug!(key = %key, reason = %reason, "Key left in place");
                    skipped += 1;
                }
            }
        }

        let attempted = tasks.len();
        let bucket = request.destination_bucket.as_str();
        let failures: Vec<RelocationFailure> = stream::iter(tasks)
            .map(|task| self.relocate(bucket, task))
            .buffer_unordered(self.max_concurrency.max(1))
            .filter_map(|outcome| async move { outcome.err() })
            .collect()
            .await;

        if !failures.is_empty() {
            for failure in &failures {
                warn!(
                    source_key = %failure.task.source_key,
                    destination_key = %failure.task.destination_key,
                    step = %failure.step,
                    error = %failure.error,
                    "Relocation failed"
                );
            }
            return Err(IngestError::PartialRelocation {
                attempted,
                failed: failures.len(),
                failures,
            });
        }

        info!(
            listed = keys.len(),
            moved = attempted,
            skipped = skipped,
            "{}",
            messages::FILES_MOVED
        );

        Ok(RelocationSummary {
            listed: keys.len(),
            moved: attempted,
            skipped,
        })
    }

    async fn relocate(
        &self,
        bucket: &str,
        task: RelocationTask,
    ) -> std::result::Result<(), RelocationFailure> {
        if let Err(e) = self
            .store
            .copy_object(bucket, &task.source_key, &task.destination_key)
            .await
        {
            return Err(RelocationFailure {
                task,
                step: RelocationStep::Copy,
                error: e.to_string(),
            });
        }

        if let Err(e) = self.store.delete_object(bucket, &task.source_key).await {
            return Err(RelocationFailure {
                task,
                step: RelocationStep::Delete,
                error: e.to_string(),
            });
        }

        debug!(
            source_key = %task.source_key,
            destination_key = %task.destination_key,
            "Object relocated"
        );
        Ok(())
    }

    /// Run a pass and render the outcome as a stage response
    pub async fn handle(&self, request: &RelocationRequest) -> StageResponse {
        match self.process(request).await {
            Ok(summary) if summary.is_empty_listing() => {
                StageResponse::new(status_codes::OK, json!({ "message": messages::NO_FILES_FOUND }))
            }
            Ok(summary) => StageResponse::new(
                status_codes::OK,
                json!({
                    "message": messages::FILES_MOVED,
                    "moved": summary.moved,
                    "skipped": summary.skipped,
                }),
            ),
            Err(error) => StageResponse::new(
                status_codes::INTERNAL_ERROR,
                json!({
                    "message": messages::MOVE_FAILED,
                    "error": error.to_string(),
                }),
            ),
        }
    }

    /// Decode a raw stage event and handle it; a malformed event is a 400
    pub async fn handle_event(&self, event: serde_json::Value) -> StageResponse {
        match serde_json::from_value::<RelocationRequest>(event) {
            Ok(request) => self.handle(&request).await,
            Err(error) => StageResponse::new(
                status_codes::BAD_REQUEST,
                json!({
                    "message": messages::MOVE_FAILED,
                    "error": format!("invalid request: {error}"),
                }),
            ),
        }
    }
}
