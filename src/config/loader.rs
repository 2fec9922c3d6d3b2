//! Configuration Loader
//!
//! Environment-aware loading: a base `ingest.toml`, an optional
//! `ingest.<environment>.toml` overlay, then `INGEST__SECTION__KEY`
//! environment variables, merged in that order by the `config` crate.

use super::error::{ConfigResult, ConfigurationError};
use super::PipelineConfig;
use crate::constants::{defaults, env as env_keys};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::env;
use std::path::Path;
use tracing::debug;

type Builder = ConfigBuilder<config::builder::DefaultState>;

/// Loads and validates [`PipelineConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            env_prefix: env_keys::CONFIG_ENV_PREFIX.to_string(),
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `<prefix>__SECTION__KEY` instead of `INGEST__...`
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Current deployment environment, lower-cased
    pub fn detect_environment() -> String {
        env_keys::ENVIRONMENT_VARS
            .iter()
            .find_map(|name| env::var(name).ok())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| defaults::ENVIRONMENT.to_string())
            .to_lowercase()
    }

    /// Load from a directory using the detected environment
    pub fn load_from_directory(&self, config_dir: &Path) -> ConfigResult<PipelineConfig> {
        self.load_from_directory_with_env(config_dir, &Self::detect_environment())
    }

    /// Load from a directory with an explicit environment.
    ///
    /// Useful for tests that must not touch process-wide variables.
    pub fn load_from_directory_with_env(
        &self,
        config_dir: &Path,
        environment: &str,
    ) -> ConfigResult<PipelineConfig> {
        let base = config_dir.join(format!("{}.toml", env_keys::CONFIG_FILE_STEM));
        if !base.exists() {
            return Err(ConfigurationError::config_file_not_found(vec![base]));
        }
        let overlay = config_dir.join(format!(
            "{}.{}.toml",
            env_keys::CONFIG_FILE_STEM,
            environment
        ));

        debug!(
            environment = %environment,
            config_dir = %config_dir.display(),
            overlay_present = overlay.exists(),
            "Loading pipeline configuration"
        );

        let builder = Config::builder()
            .add_source(File::from(base).format(FileFormat::Toml).required(true))
            .add_source(File::from(overlay).format(FileFormat::Toml).required(false));

        self.finish(builder, &config_dir.display().to_string())
    }

    /// Load a single file plus environment overrides
    pub fn load_from_file(&self, path: &Path) -> ConfigResult<PipelineConfig> {
        if !path.exists() {
            return Err(ConfigurationError::config_file_not_found(vec![
                path.to_path_buf()
            ]));
        }

        let builder = Config::builder().add_source(
            File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(true),
        );

        self.finish(builder, &path.display().to_string())
    }

    /// Parse TOML text without consulting the environment
    pub fn from_toml_str(contents: &str) -> ConfigResult<PipelineConfig> {
        let config = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigurationError::load_error("inline TOML", e))?;

        Self::deserialize(config, "inline TOML")
    }

    fn finish(&self, builder: Builder, source_name: &str) -> ConfigResult<PipelineConfig> {
        let config = builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator(env_keys::CONFIG_ENV_SEPARATOR)
                    .separator(env_keys::CONFIG_ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigurationError::load_error(source_name, e))?;

        Self::deserialize(config, source_name)
    }

    fn deserialize(config: Config, source_name: &str) -> ConfigResult<PipelineConfig> {
        let pipeline: PipelineConfig = config
            .try_deserialize()
            .map_err(|e| ConfigurationError::load_error(source_name, e))?;

        pipeline.validate()?;

        debug!(
            dataset = %pipeline.dataset.name,
            job = %pipeline.job.name,
            output_bucket = %pipeline.output.bucket,
            timeout_minutes = pipeline.workflow.timeout_minutes,
            "Configuration loaded successfully"
        );

        Ok(pipeline)
    }
}
