//! Dataset definition update that scopes the transform job's input to a window.

use crate::models::window::ExecutionWindow;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Filter expression selecting input objects modified inside the window
pub const LAST_MODIFIED_EXPRESSION: &str = "(AFTER :start_date) AND (BEFORE :end_date)";
pub const START_DATE_REFERENCE: &str = ":start_date";
pub const END_DATE_REFERENCE: &str = ":end_date";

fn default_parameter_type() -> String {
    "String".to_string()
}

fn default_create_column() -> bool {
    true
}

/// Dynamic segment of the raw key pattern, e.g. `{sensor_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathParameter {
    pub name: String,
    #[serde(rename = "type", default = "default_parameter_type")]
    pub parameter_type: String,
    /// Whether the segment value is materialized as a column
    #[serde(default = "default_create_column")]
    pub create_column: bool,
}

impl PathParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_type: default_parameter_type(),
            create_column: default_create_column(),
        }
    }

    pub fn without_column(mut self) -> Self {
        self.create_column = false;
        self
    }
}

/// Raw input location and key pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLocation {
    pub bucket: String,
    pub key: String,
}

/// Last-modified filter bound to the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastModifiedCondition {
    pub expression: String,
    /// `:start_date` as RFC 3339
    pub start_date: String,
    /// `:end_date` as RFC 3339
    pub end_date: String,
}

impl LastModifiedCondition {
    pub fn for_window(window: &ExecutionWindow) -> Self {
        Self {
            expression: LAST_MODIFIED_EXPRESSION.to_string(),
            start_date: window.start().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            end_date: window.end().to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// Payload sent to the dataset definition service before each job run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetUpdate {
    pub name: String,
    pub input: InputLocation,
    pub last_modified_condition: LastModifiedCondition,
    pub path_parameters: Vec<PathParameter>,
}

impl DatasetUpdate {
    pub fn new(
        name: impl Into<String>,
        input: InputLocation,
        path_parameters: Vec<PathParameter>,
        window: &ExecutionWindow,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            last_modified_condition: LastModifiedCondition::for_window(window),
            path_parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_condition_binds_window_bounds() {
        let window = ExecutionWindow::new(
            Utc.with_ymd_and_hms(2025, 1, 30, 1, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap(),
        )
        .unwrap();

        let condition = LastModifiedCondition::for_window(&window);
        assert_eq!(condition.expression, LAST_MODIFIED_EXPRESSION);
        assert_eq!(condition.start_date, "2025-01-30T01:00:00Z");
        assert_eq!(condition.end_date, "2025-03-30T01:00:00Z");
    }

    #[test]
    fn test_path_parameter_defaults() {
        let parsed: PathParameter = serde_json::from_str(r#"{"name": "sensor_id"}"#).unwrap();
        assert_eq!(parsed, PathParameter::new("sensor_id"));
        assert_eq!(parsed.parameter_type, "String");
        assert!(parsed.create_column);

        let explicit: PathParameter =
            serde_json::from_str(r#"{"name": "ingestion_date", "create_column": false}"#).unwrap();
        assert_eq!(explicit, PathParameter::new("ingestion_date").without_column());
    }
}
