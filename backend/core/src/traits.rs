use async_trait::async_trait;

use crate::error::VisionError;
use crate::request::RecognitionRequest;
use crate::types::{
    DetectDocumentTextResponse, RecognitionResponse, RecognizeCelebritiesResponse, ResponseKind,
};

/// A remote recognition backend (Textract/Rekognition or a stand-in).
///
/// Implementations make exactly one remote call per method invocation and
/// keep no state between calls. Failures are returned as
/// [`VisionError::Service`]; nothing is retried here.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Backend name used in logs (e.g., "aws", "mock").
    fn name(&self) -> &str;

    /// Run document text detection on the request payload.
    async fn detect_document_text(
        &self,
        request: &RecognitionRequest,
    ) -> Result<DetectDocumentTextResponse, VisionError>;

    /// Run celebrity recognition on the request payload.
    async fn recognize_celebrities(
        &self,
        request: &RecognitionRequest,
    ) -> Result<RecognizeCelebritiesResponse, VisionError>;

    /// Dispatch on the response kind.
    async fn recognize(
        &self,
        kind: ResponseKind,
        request: &RecognitionRequest,
    ) -> Result<RecognitionResponse, VisionError> {
        match kind {
            ResponseKind::Document => self
                .detect_document_text(request)
                .await
                .map(RecognitionResponse::Document),
            ResponseKind::Celebrities => self
                .recognize_celebrities(request)
                .await
                .map(RecognitionResponse::Celebrities),
        }
    }
}
