use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

/// Instants between the epoch and 2100, with sub-second precision
pub fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

/// A single key segment without separators
pub fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_=-]{1,12}"
}

/// Keys of one to six segments, some ending in `.csv`
pub fn object_key_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(segment_strategy(), 0..5),
        segment_strategy(),
        prop_oneof![Just(".csv"), Just(".json"), Just("")],
    )
        .prop_map(|(directories, file, extension)| {
            let mut segments = directories;
            segments.push(format!("{file}{extension}"));
            segments.join("/")
        })
}

/// Job states as reported by the service, including unknown ones
pub fn job_state_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("STARTING".to_string()),
        Just("WAITING".to_string()),
        Just("RUNNING".to_string()),
        Just("STOPPING".to_string()),
        Just("SUCCEEDED".to_string()),
        Just("FAILED".to_string()),
        Just("TIMEOUT".to_string()),
        Just("STOPPED".to_string()),
        "[A-Z_]{3,12}",
    ]
}
