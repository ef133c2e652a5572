//! `cloudsight-config`: runtime configuration for the recognition pipelines.
//!
//! Provides:
//! - Typed config schema (service endpoints, OCR cache, annotation style, logging)
//! - YAML loading with a missing file treated as "all defaults"
//! - `${ENV_VAR}` substitution and `CLOUDSIGHT_*` overrides
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::CloudsightConfig;
pub use validation::{
    check_confidence_threshold, validate, ConfigValidationError, ValidationReport,
};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// A config ready for use, plus the validation warnings found while preparing it.
///
/// Warnings are returned rather than logged so the caller can report them
/// once its logger is installed.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: CloudsightConfig,
    pub warnings: Vec<ConfigValidationError>,
}

impl PreparedConfig {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
    }
}

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime. Any
/// validation error fails the load with every error in the message.
pub async fn load_and_prepare(path: &Path) -> Result<PreparedConfig> {
    let raw_config = load_config(path).await?;

    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: CloudsightConfig = serde_json::from_value(value)
        .context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        bail!("{} config error(s): {}", errors.len(), errors.join("; "));
    }

    Ok(PreparedConfig {
        config,
        warnings: report.warnings,
    })
}
