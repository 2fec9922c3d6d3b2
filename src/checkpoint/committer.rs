//! Final step of a successful cycle.

use crate::checkpoint::store::CheckpointStore;
use crate::error::Result;
use crate::models::{Checkpoint, ExecutionWindow, RelocationSummary};
use std::sync::Arc;
use tracing::info;

/// Advances a dataset's checkpoint to the end of a processed window
#[derive(Debug, Clone)]
pub struct CheckpointCommitter {
    store: Arc<dyn CheckpointStore>,
}

impl CheckpointCommitter {
    pub fn new(store: Arc<dyn CheckpointStore>) -> Self {
        Self { store }
    }

    /// Persist `window.end` as the dataset's checkpoint.
    ///
    /// Requires the summary of a fully successful post-processing pass, which
    /// only exists when every relocation completed.
    pub async fn commit(
        &self,
        dataset_id: &str,
        window: &ExecutionWindow,
        evidence: &RelocationSummary,
    ) -> Result<Checkpoint> {
        let checkpoint = Checkpoint::new(dataset_id, window.end());
        self.store.set(&checkpoint).await?;

        info!(
            dataset_id = %dataset_id,
            checkpoint = %checkpoint.encode_value(),
            moved = evidence.moved,
            skipped = evidence.skipped,
            "Checkpoint committed"
        );

        Ok(checkpoint)
    }
}
