use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the recognition pipelines.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("service error ({service}): {code}: {message}")]
    Service {
        service: String,
        code: String,
        message: String,
    },

    #[error("cache file {} is not a valid response: {source}", path.display())]
    CorruptCache {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl VisionError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn service(
        service: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Service {
            service: service.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// True for failures reported by (or on the way to) the remote service.
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}
