use std::path::PathBuf;

use cloudsight_config::defaults::{
    DEFAULT_CACHE_PATH, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_DOCUMENT, DEFAULT_FONT_PATH,
    DEFAULT_FONT_SIZE, DEFAULT_IMAGES_DIR, DEFAULT_LOG_LEVEL, DEFAULT_OUTPUT_SUFFIX,
    DEFAULT_REGION,
};
use cloudsight_config::{check_confidence_threshold, CloudsightConfig};
use cloudsight_core::CacheMode;
use cloudsight_media::{AnnotationStyle, Annotator};
use cloudsight_understanding::{AwsVisionClient, Credentials};
use tracing::{info, warn};

/// Flattened runtime settings for both pipelines.
#[derive(Debug, Clone)]
pub struct Settings {
    /// AWS region for default endpoints
    pub region: String,
    pub textract_endpoint: Option<String>,
    pub rekognition_endpoint: Option<String>,

    // OCR
    pub document: PathBuf,
    pub cache_path: PathBuf,
    pub cache_mode: CacheMode,

    // Celebrities
    pub photos: Vec<PathBuf>,
    pub confidence_threshold: f64,
    pub font_path: PathBuf,
    pub font_size: f32,
    pub output_suffix: String,

    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Flatten a prepared config. Input file names are resolved against `imagesDir`.
    pub fn from_config(config: &CloudsightConfig) -> Self {
        let images_dir =
            PathBuf::from(config.images_dir.as_deref().unwrap_or(DEFAULT_IMAGES_DIR));
        let aws = config.aws.clone().unwrap_or_default();
        let ocr = config.ocr.clone().unwrap_or_default();
        let celebs = config.celebrities.clone().unwrap_or_default();
        let logging = config.logging.clone().unwrap_or_default();

        Self {
            region: aws.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            textract_endpoint: aws.textract_endpoint,
            rekognition_endpoint: aws.rekognition_endpoint,
            document: images_dir.join(ocr.document.as_deref().unwrap_or(DEFAULT_DOCUMENT)),
            cache_path: PathBuf::from(ocr.cache_path.as_deref().unwrap_or(DEFAULT_CACHE_PATH)),
            cache_mode: ocr.cache_mode.unwrap_or_default(),
            photos: celebs
                .photos
                .unwrap_or_default()
                .iter()
                .map(|p| images_dir.join(p))
                .collect(),
            confidence_threshold: celebs
                .confidence_threshold
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
            font_path: PathBuf::from(celebs.font_path.as_deref().unwrap_or(DEFAULT_FONT_PATH)),
            font_size: celebs.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            output_suffix: celebs
                .output_suffix
                .unwrap_or_else(|| DEFAULT_OUTPUT_SUFFIX.to_string()),
            log_level: logging
                .level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_dir: logging.dir.map(PathBuf::from),
        }
    }

    /// The one service client for this run, signed with credentials from the environment.
    pub fn build_client(&self) -> AwsVisionClient {
        self.build_client_with(Credentials::from_env())
    }

    pub fn build_client_with(&self, credentials: Option<Credentials>) -> AwsVisionClient {
        let mut client = AwsVisionClient::new(&self.region);
        if let Some(url) = &self.textract_endpoint {
            client = client.with_textract_endpoint(url.clone());
        }
        if let Some(url) = &self.rekognition_endpoint {
            client = client.with_rekognition_endpoint(url.clone());
        }
        match credentials {
            Some(credentials) => client = client.with_credentials(credentials),
            None => warn!(
                "No AWS credentials (AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY); \
                 only custom endpoints can be reached"
            ),
        }

        info!(
            textract = client.textract_endpoint(),
            rekognition = client.rekognition_endpoint(),
            signed = client.is_signing(),
            "Configured recognition endpoints"
        );
        client
    }

    /// Annotator with the configured style; runs without labels if the font won't load.
    pub fn build_annotator(&self) -> Annotator {
        let style = AnnotationStyle {
            font_size: self.font_size,
            ..AnnotationStyle::default()
        };
        let annotator = Annotator::new(style).with_threshold(self.confidence_threshold);
        match Annotator::load_font(&self.font_path) {
            Ok(font) => annotator.with_font(font),
            Err(e) => {
                warn!(error = %e, "Labels disabled");
                annotator
            }
        }
    }
}

/// Clap value parser for `--threshold`; same bounds as `celebrities.confidenceThreshold`.
pub fn parse_threshold(raw: &str) -> Result<f64, String> {
    let threshold: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("not a number: {e}"))?;
    check_confidence_threshold(threshold)?;
    Ok(threshold)
}
