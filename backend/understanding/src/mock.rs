use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cloudsight_core::{
    DetectDocumentTextResponse, RecognitionRequest, RecognitionService,
    RecognizeCelebritiesResponse, VisionError,
};

/// A recognition service that returns canned responses and counts calls.
pub struct MockVisionService {
    name: String,
    document: DetectDocumentTextResponse,
    celebrities: RecognizeCelebritiesResponse,
    failure: Option<(String, String)>,
    calls: AtomicUsize,
}

impl MockVisionService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: DetectDocumentTextResponse::default(),
            celebrities: RecognizeCelebritiesResponse::default(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_document(mut self, response: DetectDocumentTextResponse) -> Self {
        self.document = response;
        self
    }

    pub fn with_celebrities(mut self, response: RecognizeCelebritiesResponse) -> Self {
        self.celebrities = response;
        self
    }

    /// Every call fails with a service error carrying `code` and `message`.
    pub fn failing(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.failure = Some((code.into(), message.into()));
        self
    }

    /// Number of remote calls made so far, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<(), VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some((code, message)) => Err(VisionError::service(&self.name, code, message)),
            None => Ok(()),
        }
    }
}

impl Default for MockVisionService {
    fn default() -> Self {
        Self::new("mock")
    }
}

#[async_trait]
impl RecognitionService for MockVisionService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn detect_document_text(
        &self,
        _request: &RecognitionRequest,
    ) -> Result<DetectDocumentTextResponse, VisionError> {
        self.record_call()?;
        Ok(self.document.clone())
    }

    async fn recognize_celebrities(
        &self,
        _request: &RecognitionRequest,
    ) -> Result<RecognizeCelebritiesResponse, VisionError> {
        self.record_call()?;
        Ok(self.celebrities.clone())
    }
}
