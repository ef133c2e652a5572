//! Config file location and loading.

use crate::schema::CloudsightConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the cloudsight config directory.
/// Priority: `CLOUDSIGHT_CONFIG_DIR` env > `~/.cloudsight/` > `./.cloudsight/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CLOUDSIGHT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".cloudsight"),
        None => PathBuf::from(".cloudsight"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<CloudsightConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(CloudsightConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: CloudsightConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsight_core::CacheMode;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&config_file_path(dir.path())).await.unwrap();
        assert!(config.ocr.is_none());
        assert!(config.aws.is_none());
    }

    #[tokio::test]
    async fn parses_camel_case_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(
            &path,
            "imagesDir: fotos\nocr:\n  cacheMode: return-fetched\ncelebrities:\n  photos: [a.jpg]\n  confidenceThreshold: 80\n",
        )
        .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.images_dir.as_deref(), Some("fotos"));
        assert_eq!(config.ocr.unwrap().cache_mode, Some(CacheMode::ReturnFetched));
        let celebs = config.celebrities.unwrap();
        assert_eq!(celebs.photos.unwrap(), vec!["a.jpg".to_string()]);
        assert_eq!(celebs.confidence_threshold, Some(80.0));
    }

    #[tokio::test]
    async fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "ocr: [unclosed").unwrap();
        assert!(load_config(&path).await.is_err());
    }
}
