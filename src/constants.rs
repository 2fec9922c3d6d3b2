//! # System Constants
//!
//! Defaults and fixed strings that define the operational boundaries of an
//! ingestion cycle.

/// Configuration defaults
pub mod defaults {
    pub const POLL_INTERVAL_SECONDS: u64 = 30;
    pub const DESCRIBE_MAX_ATTEMPTS: u32 = 3;
    pub const DESCRIBE_RETRY_DELAY_SECONDS: u64 = 5;
    pub const WORKFLOW_TIMEOUT_MINUTES: u64 = 15;

    pub const TEMPORARY_PREFIX: &str = "tmp";
    pub const DESTINATION_PREFIX: &str = "data";
    pub const FILE_EXTENSION: &str = ".csv";
    /// Leading key segments removed when computing a destination key
    pub const DROPPED_SEGMENTS: usize = 2;
    pub const MAX_CONCURRENT_RELOCATIONS: usize = 16;

    pub const CHECKPOINT_PARAMETER_PREFIX: &str = "/tasker-ingest/last-execution";

    pub const ENVIRONMENT: &str = "development";
}

/// Environment variable names and the configuration file layout
pub mod env {
    pub const ENVIRONMENT_VARS: &[&str] = &["INGEST_ENV", "APP_ENV"];
    pub const LOG_FORMAT_VAR: &str = "INGEST_LOG_FORMAT";
    /// Prefix of `INGEST__SECTION__KEY` overrides
    pub const CONFIG_ENV_PREFIX: &str = "INGEST";
    pub const CONFIG_ENV_SEPARATOR: &str = "__";
    pub const CONFIG_FILE_STEM: &str = "ingest";
}

/// Response bodies of the post-processing stage
pub mod messages {
    pub const NO_FILES_FOUND: &str = "No files found to move";
    pub const FILES_MOVED: &str = "Files moved successfully.";
    pub const MOVE_FAILED: &str = "Error moving files";
}

/// HTTP-style status codes carried by stage responses
pub mod status_codes {
    pub const OK: u16 = 200;
    pub const BAD_REQUEST: u16 = 400;
    pub const INTERNAL_ERROR: u16 = 500;
}
