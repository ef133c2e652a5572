//! Textract / Rekognition over the AWS JSON 1.1 protocol.
//!
//! Requests are SigV4-signed when credentials are set. Without credentials
//! they go out unsigned, which only works against a signing proxy or a
//! local emulator.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cloudsight_core::{
    DetectDocumentTextResponse, RecognitionRequest, RecognitionService,
    RecognizeCelebritiesResponse, VisionError,
};
use cloudsight_logging::redact_sensitive_data;

use crate::sigv4::{self, Credentials};

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const TEXTRACT_TARGET: &str = "Textract.DetectDocumentText";
const REKOGNITION_TARGET: &str = "RekognitionService.RecognizeCelebrities";

pub fn default_textract_endpoint(region: &str) -> String {
    format!("https://textract.{}.amazonaws.com/", region)
}

pub fn default_rekognition_endpoint(region: &str) -> String {
    format!("https://rekognition.{}.amazonaws.com/", region)
}

/// True for the public `*.amazonaws.com` endpoints, which reject unsigned requests.
pub fn is_aws_endpoint(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.ends_with(".amazonaws.com")))
        .unwrap_or(false)
}

/// HTTP client for the two recognition operations.
pub struct AwsVisionClient {
    client: Client,
    region: String,
    credentials: Option<Credentials>,
    textract_endpoint: String,
    rekognition_endpoint: String,
}

impl AwsVisionClient {
    pub fn new(region: &str) -> Self {
        Self::with_client(Client::new(), region)
    }

    pub fn with_client(client: Client, region: &str) -> Self {
        Self {
            client,
            region: region.to_string(),
            credentials: None,
            textract_endpoint: default_textract_endpoint(region),
            rekognition_endpoint: default_rekognition_endpoint(region),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_textract_endpoint(mut self, url: impl Into<String>) -> Self {
        self.textract_endpoint = url.into();
        self
    }

    pub fn with_rekognition_endpoint(mut self, url: impl Into<String>) -> Self {
        self.rekognition_endpoint = url.into();
        self
    }

    pub fn textract_endpoint(&self) -> &str {
        &self.textract_endpoint
    }

    pub fn rekognition_endpoint(&self) -> &str {
        &self.rekognition_endpoint
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn is_signing(&self) -> bool {
        self.credentials.is_some()
    }

    async fn call<B, R>(
        &self,
        service: &str,
        endpoint: &str,
        target: &str,
        body: &B,
    ) -> Result<R, VisionError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = Url::parse(endpoint).map_err(|e| {
            VisionError::Config(format!("invalid {} endpoint '{}': {}", service, endpoint, e))
        })?;
        if self.credentials.is_none() && is_aws_endpoint(endpoint) {
            return Err(VisionError::Config(format!(
                "no AWS credentials to sign {} requests to {}: set AWS_ACCESS_KEY_ID and \
                 AWS_SECRET_ACCESS_KEY, or point the endpoint at a signing proxy",
                service, endpoint
            )));
        }
        let payload = serde_json::to_vec(body)?;
        debug!(
            service,
            x_amz_target = target,
            endpoint,
            signed = self.credentials.is_some(),
            "Sending recognition request"
        );

        let mut request = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", target);
        if let Some(credentials) = &self.credentials {
            let signed = sigv4::sign(
                credentials,
                &self.region,
                service,
                "POST",
                &url,
                &[("content-type", AMZ_JSON), ("x-amz-target", target)],
                &payload,
                Utc::now(),
            );
            for (name, value) in signed {
                request = request.header(name, value);
            }
        }

        let response = request
            .body(payload)
            .send()
            .await
            .map_err(|e| VisionError::service(service, "Transport", e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VisionError::service(service, "Transport", e.to_string()))?;

        if !status.is_success() {
            let (code, message) = parse_error_body(status.as_u16(), &text);
            warn!(
                service,
                status = status.as_u16(),
                code = %code,
                body = %redact_sensitive_data(&text),
                "Recognition request rejected"
            );
            return Err(VisionError::service(service, code, message));
        }

        serde_json::from_str(&text)
            .map_err(|e| VisionError::service(service, "MalformedResponse", e.to_string()))
    }
}

#[async_trait]
impl RecognitionService for AwsVisionClient {
    fn name(&self) -> &str {
        "aws"
    }

    async fn detect_document_text(
        &self,
        request: &RecognitionRequest,
    ) -> Result<DetectDocumentTextResponse, VisionError> {
        info!(
            source = %request.source().display(),
            bytes = request.len(),
            "[Textract] Detecting document text"
        );
        let body = DetectDocumentTextRequest {
            document: BytesSource::encode(request.payload()),
        };
        self.call("textract", &self.textract_endpoint, TEXTRACT_TARGET, &body)
            .await
    }

    async fn recognize_celebrities(
        &self,
        request: &RecognitionRequest,
    ) -> Result<RecognizeCelebritiesResponse, VisionError> {
        info!(
            source = %request.source().display(),
            bytes = request.len(),
            "[Rekognition] Recognizing celebrities"
        );
        let body = RecognizeCelebritiesRequest {
            image: BytesSource::encode(request.payload()),
        };
        self.call(
            "rekognition",
            &self.rekognition_endpoint,
            REKOGNITION_TARGET,
            &body,
        )
        .await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetectDocumentTextRequest {
    document: BytesSource,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RecognizeCelebritiesRequest {
    image: BytesSource,
}

/// Inline payload; the JSON protocol carries blobs as base64 strings.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct BytesSource {
    bytes: String,
}

impl BytesSource {
    fn encode(payload: &[u8]) -> Self {
        Self {
            bytes: STANDARD.encode(payload),
        }
    }
}

#[derive(Deserialize)]
struct AwsErrorBody {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Pull `(code, message)` out of an AWS JSON error body.
///
/// `__type` may be namespaced (`com.amazonaws...#InvalidParameterException`);
/// only the part after the last `#` is kept. Bodies that are not JSON fall
/// back to the HTTP status and the raw text.
fn parse_error_body(status: u16, body: &str) -> (String, String) {
    match serde_json::from_str::<AwsErrorBody>(body) {
        Ok(parsed) => {
            let code = parsed
                .kind
                .as_deref()
                .map(|k| k.rsplit('#').next().unwrap_or(k).to_string())
                .unwrap_or_else(|| format!("Http{}", status));
            let message = parsed.message.unwrap_or_default();
            (code, message)
        }
        Err(_) => (format!("Http{}", status), body.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_follow_region() {
        let client = AwsVisionClient::new("sa-east-1");
        assert_eq!(
            client.textract_endpoint(),
            "https://textract.sa-east-1.amazonaws.com/"
        );
        assert_eq!(
            client.rekognition_endpoint(),
            "https://rekognition.sa-east-1.amazonaws.com/"
        );
    }

    #[test]
    fn endpoint_overrides_apply() {
        let client = AwsVisionClient::new("us-east-1")
            .with_textract_endpoint("http://localhost:4566/")
            .with_rekognition_endpoint("http://localhost:4567/");
        assert_eq!(client.textract_endpoint(), "http://localhost:4566/");
        assert_eq!(client.rekognition_endpoint(), "http://localhost:4567/");
    }

    #[test]
    fn recognizes_public_endpoints() {
        assert!(is_aws_endpoint(&default_textract_endpoint("us-east-1")));
        assert!(is_aws_endpoint("https://rekognition.eu-west-1.amazonaws.com"));
        assert!(!is_aws_endpoint("http://localhost:4566/"));
        assert!(!is_aws_endpoint("not a url"));
    }

    #[test]
    fn credentials_switch_signing_on() {
        let client = AwsVisionClient::new("us-east-1");
        assert!(!client.is_signing());
        let client = client.with_credentials(Credentials::new("AKIDEXAMPLE", "secret"));
        assert!(client.is_signing());
        assert_eq!(client.region(), "us-east-1");
    }

    #[tokio::test]
    async fn invalid_endpoint_is_a_config_error() {
        let client = AwsVisionClient::new("us-east-1").with_textract_endpoint("::nope");
        let request = RecognitionRequest::new("doc.jpeg", vec![1, 2, 3]);
        let err = client.detect_document_text(&request).await.unwrap_err();
        assert!(matches!(err, VisionError::Config(_)));
    }

    #[tokio::test]
    async fn unsigned_call_to_public_endpoint_fails_without_sending() {
        let client = AwsVisionClient::new("us-east-1");
        let request = RecognitionRequest::new("bbc.jpg", vec![0xFF, 0xD8]);
        let err = client.recognize_celebrities(&request).await.unwrap_err();
        assert!(!err.is_service());
        assert!(err.to_string().contains("AWS_ACCESS_KEY_ID"));
    }

    #[test]
    fn document_request_body_is_base64_bytes() {
        let body = DetectDocumentTextRequest {
            document: BytesSource::encode(b"hello"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "Document": { "Bytes": "aGVsbG8=" } }));
    }

    #[test]
    fn celebrity_request_body_uses_image_key() {
        let body = RecognizeCelebritiesRequest {
            image: BytesSource::encode(&[0xFF, 0xD8]),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["Image"]["Bytes"], "/9g=");
    }

    #[test]
    fn parses_namespaced_error_type() {
        let body = r#"{"__type":"com.amazonaws.rekognition#InvalidImageFormatException","Message":"Request has invalid image format"}"#;
        let (code, message) = parse_error_body(400, body);
        assert_eq!(code, "InvalidImageFormatException");
        assert_eq!(message, "Request has invalid image format");
    }

    #[test]
    fn parses_lowercase_message_field() {
        let body = r#"{"__type":"ProvisionedThroughputExceededException","message":"slow down"}"#;
        let (code, message) = parse_error_body(400, body);
        assert_eq!(code, "ProvisionedThroughputExceededException");
        assert_eq!(message, "slow down");
    }

    #[test]
    fn non_json_error_falls_back_to_status() {
        let (code, message) = parse_error_body(502, "Bad Gateway\n");
        assert_eq!(code, "Http502");
        assert_eq!(message, "Bad Gateway");
    }
}
