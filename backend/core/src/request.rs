use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::VisionError;

/// Bytes of one image or document plus the path they were read from.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    source: PathBuf,
    payload: Vec<u8>,
}

impl RecognitionRequest {
    pub fn new(source: impl Into<PathBuf>, payload: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            payload,
        }
    }

    /// Read the whole file at `path` into a request.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let path = path.as_ref();
        let payload = tokio::fs::read(path)
            .await
            .map_err(|e| VisionError::io(path, e))?;
        debug!(path = %path.display(), bytes = payload.len(), "Read recognition payload");
        Ok(Self::new(path, payload))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
