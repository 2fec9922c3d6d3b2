//! # Structured Logging
//!
//! Environment-aware `tracing` setup and the `log_cycle!` macro used at the
//! stage boundaries of an ingestion cycle.

use crate::constants::{defaults, env as env_keys};
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Output format of the console layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; only the first call installs a subscriber,
/// and an already-installed global subscriber is left in place.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let format = get_log_format();

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .boxed(),
        };

        let subscriber = tracing_subscriber::registry().with(layer.with_filter(filter));

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            format = ?format,
            "Structured logging initialized"
        );
    });
}

/// Current environment from `INGEST_ENV`, then `APP_ENV`
pub fn get_environment() -> String {
    env_keys::ENVIRONMENT_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .unwrap_or_else(|| defaults::ENVIRONMENT.to_string())
}

/// Default filter directive when `RUST_LOG` is unset
pub fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" => "warn",
        _ => "debug",
    }
}

fn get_log_format() -> LogFormat {
    match std::env::var(env_keys::LOG_FORMAT_VAR) {
        Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

#[doc(hidden)]
pub mod __private {
    pub use chrono::Utc;
    pub use tracing;
}

/// Log a cycle operation with the uniform `operation`/`timestamp` shape.
///
/// ```rust
/// use tasker_ingest::log_cycle;
///
/// log_cycle!(info, "window_computed", dataset_id: "weather-raw", initial: false);
/// ```
#[macro_export]
macro_rules! log_cycle {
    // Full form with execution_id
    ($level:ident, $operation:expr, execution_id: $execution_id:expr, $($key:ident: $value:expr),* $(,)?) => {
        $crate::logging::__private::tracing::$level!(
            operation = %$operation,
            execution_id = %$execution_id,
            $($key = ?$value,)*
            timestamp = %$crate::logging::__private::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        $crate::logging::__private::tracing::$level!(
            operation = %$operation,
            timestamp = %$crate::logging::__private::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    // Generic form with additional fields
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        $crate::logging::__private::tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %$crate::logging::__private::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}
