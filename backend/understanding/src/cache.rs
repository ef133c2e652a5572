//! File-backed response cache.
//!
//! A response is stored as JSON at a fixed path. A missing or unreadable
//! file triggers one fetch whose result is written back; what the caller
//! gets on that cold call depends on [`CacheMode`].

use std::ffi::OsString;
use std::future::Future;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, error, info};

use cloudsight_core::{
    CacheMode, DetectDocumentTextResponse, RecognitionRequest, RecognitionService, VisionError,
};
use cloudsight_logging::{EventLogger, PipelineEvent};

pub struct ResponseCache<T> {
    path: PathBuf,
    mode: CacheMode,
    _response: PhantomData<fn() -> T>,
}

impl<T> ResponseCache<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>, mode: CacheMode) -> Self {
        Self {
            path: path.into(),
            mode,
            _response: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Return the cached response, or fetch and store it.
    ///
    /// Service errors from `fetch` are logged and turned into an empty
    /// response with nothing written. Every other error propagates.
    pub async fn load_or_fetch<F, Fut>(&self, fetch: F) -> Result<T, VisionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, VisionError>>,
    {
        match fs::read(&self.path).await {
            Ok(raw) => {
                let value = serde_json::from_slice(&raw).map_err(|e| VisionError::CorruptCache {
                    path: self.path.clone(),
                    source: e,
                })?;
                debug!(path = %self.path.display(), "Response cache hit");
                EventLogger::log_event(
                    "cache",
                    PipelineEvent::CacheHit {
                        path: self.path.display().to_string(),
                    },
                );
                return Ok(value);
            }
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Response cache miss");
            }
        }

        let fetched = match fetch().await {
            Ok(value) => value,
            Err(e) if e.is_service() => {
                error!(path = %self.path.display(), error = %e, "Failed to fetch response; cache left cold");
                return Ok(T::default());
            }
            Err(e) => return Err(e),
        };

        self.store(&fetched).await?;
        EventLogger::log_event(
            "cache",
            PipelineEvent::CacheWarmed {
                path: self.path.display().to_string(),
            },
        );

        match self.mode {
            CacheMode::WarmOnly => {
                info!(path = %self.path.display(), "Cache warmed; run again to read it");
                Ok(T::default())
            }
            CacheMode::ReturnFetched => Ok(fetched),
        }
    }

    /// Serialize `value` to the cache path (temp file, then rename).
    pub async fn store(&self, value: &T) -> Result<(), VisionError> {
        let json = serde_json::to_vec(value)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| VisionError::io(parent, e))?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &json)
            .await
            .map_err(|e| VisionError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| VisionError::io(&self.path, e))?;

        debug!(path = %self.path.display(), bytes = json.len(), "Wrote response cache");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// OCR entry point: the document is only read when the cache is cold.
pub async fn load_document_text(
    cache: &ResponseCache<DetectDocumentTextResponse>,
    service: &dyn RecognitionService,
    document: &Path,
) -> Result<DetectDocumentTextResponse, VisionError> {
    cache
        .load_or_fetch(|| async move {
            let request = RecognitionRequest::from_file(document).await?;
            EventLogger::log_event(
                "ocr",
                PipelineEvent::ServiceCall {
                    operation: "DetectDocumentText".into(),
                    source: document.display().to_string(),
                    bytes: request.len(),
                },
            );
            service.detect_document_text(&request).await
        })
        .await
}
