use crate::models::window::WindowError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Durable marker of the instant through which a dataset has been processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub dataset_id: String,
    pub last_execution_timestamp: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(dataset_id: impl Into<String>, last_execution_timestamp: DateTime<Utc>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            last_execution_timestamp,
        }
    }

    /// RFC 3339 UTC encoding stored in the parameter service.
    ///
    /// Sub-second precision is kept so the value round-trips exactly.
    pub fn encode_value(&self) -> String {
        self.last_execution_timestamp
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Parse a stored parameter value.
    ///
    /// A value that is not a timestamp is a corrupted checkpoint, reported as
    /// a window error rather than treated as absent.
    pub fn decode_value(dataset_id: impl Into<String>, value: &str) -> Result<Self, WindowError> {
        let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|e| {
            WindowError::UnparseableCheckpoint {
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self::new(dataset_id, parsed.with_timezone(&Utc)))
    }
}
