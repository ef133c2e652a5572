//! Environment handling for config values.
//!
//! Two layers: `${VAR_NAME}` references inside YAML string values are
//! substituted at load time, then well-known variables (`AWS_REGION`,
//! `CLOUDSIGHT_*`, `RUST_LOG`) override whole fields.

use anyhow::{bail, Result};
use cloudsight_core::CacheMode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{AwsConfig, CelebritiesConfig, CloudsightConfig, LoggingConfig, OcrConfig};

/// Pattern matching valid uppercase env var names.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    substitute_value(value, &std::env::vars().collect(), "")
}

/// Substitute env vars using a provided map (useful for testing).
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                error.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply field overrides from the process environment.
pub fn apply_env_overrides(config: CloudsightConfig) -> Result<CloudsightConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply field overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: CloudsightConfig,
    env: &HashMap<String, String>,
) -> Result<CloudsightConfig> {
    let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    if let Some(dir) = get("CLOUDSIGHT_IMAGES_DIR") {
        config.images_dir = Some(dir);
    }

    let aws = config.aws.get_or_insert_with(AwsConfig::default);
    if let Some(region) = get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
        aws.region = Some(region);
    }
    if let Some(url) = get("CLOUDSIGHT_TEXTRACT_ENDPOINT") {
        aws.textract_endpoint = Some(url);
    }
    if let Some(url) = get("CLOUDSIGHT_REKOGNITION_ENDPOINT") {
        aws.rekognition_endpoint = Some(url);
    }

    if let Some(mode) = get("CLOUDSIGHT_CACHE_MODE") {
        let mode: CacheMode = match mode.parse() {
            Ok(mode) => mode,
            Err(e) => bail!("CLOUDSIGHT_CACHE_MODE: {e}"),
        };
        config.ocr.get_or_insert_with(OcrConfig::default).cache_mode = Some(mode);
    }

    if let Some(font) = get("CLOUDSIGHT_FONT") {
        config
            .celebrities
            .get_or_insert_with(CelebritiesConfig::default)
            .font_path = Some(font);
    }

    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if let Some(dir) = get("CLOUDSIGHT_LOG_DIR") {
        logging.dir = Some(dir);
    }
    if let Some(level) = get("RUST_LOG") {
        logging.level = Some(level);
    }

    Ok(config)
}
