//! # Relocation Planning
//!
//! Pure rules that turn a key listed under the job's temporary output prefix
//! into a [`RelocationTask`], or explain why the key is left alone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Copy-then-delete move of one output object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelocationTask {
    pub source_key: String,
    pub destination_key: String,
}

/// Why a listed key is not relocated. Skips are never failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Key does not end with the data file extension
    ExtensionMismatch,
    /// Key has fewer path segments than the partition layout requires
    TooFewSegments { found: usize, required: usize },
    /// Computed destination equals the source; moving would delete the object
    DestinationIsSource,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtensionMismatch => write!(f, "extension_mismatch"),
            Self::TooFewSegments { found, required } => {
                write!(f, "too_few_segments ({found} < {required})")
            }
            Self::DestinationIsSource => write!(f, "destination_is_source"),
        }
    }
}

/// Naming rules applied to every listed key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationRules {
    extension: String,
    dropped_segments: usize,
    destination_prefix: String,
}

impl RelocationRules {
    pub fn new(
        extension: impl Into<String>,
        dropped_segments: usize,
        destination_prefix: impl Into<String>,
    ) -> Self {
        Self {
            extension: extension.into(),
            dropped_segments,
            destination_prefix: destination_prefix.into(),
        }
    }

    /// Minimum segment count for a key to qualify
    pub fn required_segments(&self) -> usize {
        self.dropped_segments + 1
    }

    pub fn destination_prefix(&self) -> &str {
        &self.destination_prefix
    }

    /// Plan the move for `source_key`.
    ///
    /// The key is split on `/`, the leading `dropped_segments` segments are
    /// removed, and the remainder is re-joined under the destination prefix:
    /// with the defaults, `tmp/a/b/report.csv` becomes `data/b/report.csv`.
    pub fn plan(&self, source_key: &str) -> Result<RelocationTask, SkipReason> {
        if !source_key.ends_with(&self.extension) {
            return Err(SkipReason::ExtensionMismatch);
        }

        let segments: Vec<&str> = source_key.split('/').collect();
        if segments.len() < self.required_segments() {
            return Err(SkipReason::TooFewSegments {
                found: segments.len(),
                required: self.required_segments(),
            });
        }

        let remainder = segments[self.dropped_segments..].join("/");
        let prefix = self.destination_prefix.trim_end_matches('/');
        let destination_key = if prefix.is_empty() {
            remainder
        } else {
            format!("{prefix}/{remainder}")
        };

        if destination_key == source_key {
            return Err(SkipReason::DestinationIsSource);
        }

        Ok(RelocationTask {
            source_key: source_key.to_string(),
            destination_key,
        })
    }
}

/// Which half of a relocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationStep {
    Copy,
    Delete,
}

impl fmt::Display for RelocationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A relocation that did not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationFailure {
    pub task: RelocationTask,
    pub step: RelocationStep,
    pub error: String,
}

impl fmt::Display for RelocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} -> {} failed: {}",
            self.step, self.task.source_key, self.task.destination_key, self.error
        )
    }
}

/// Result of a fully successful post-processing pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationSummary {
    /// Keys returned by the listing
    pub listed: usize,
    /// Objects copied to their destination and deleted from the source
    pub moved: usize,
    /// Keys left in place by the naming rules
    pub skipped: usize,
}

impl RelocationSummary {
    /// Whether the source prefix held nothing at all
    pub fn is_empty_listing(&self) -> bool {
        self.listed == 0
    }
}
