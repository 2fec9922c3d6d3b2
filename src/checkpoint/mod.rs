//! # Checkpoints
//!
//! The checkpoint is the only durable state of the pipeline. It is read at
//! the start of every cycle and written exactly once, at the very end of a
//! successful one.

pub mod committer;
pub mod store;

pub use committer::CheckpointCommitter;
pub use store::{CheckpointStore, ParameterCheckpointStore};
