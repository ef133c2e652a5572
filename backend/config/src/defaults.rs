//! Config defaults: bundled image names, cache file, and annotation style.

use cloudsight_core::CacheMode;

use crate::schema::{
    AwsConfig, CelebritiesConfig, CloudsightConfig, LoggingConfig, OcrConfig,
};

pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_DOCUMENT: &str = "lista-material-escolar.jpeg";
pub const DEFAULT_CACHE_PATH: &str = "response.json";
pub const DEFAULT_PHOTOS: [&str; 3] = ["bbc.jpg", "msn.jpg", "neymar-torcedores.jpg"];
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 90.0;
pub const DEFAULT_FONT_PATH: &str = "Ubuntu-R.ttf";
pub const DEFAULT_FONT_SIZE: f32 = 20.0;
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-resultado";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: CloudsightConfig) -> CloudsightConfig {
    let config = apply_aws_defaults(config);
    let config = apply_ocr_defaults(config);
    let config = apply_celebrity_defaults(config);
    let mut config = apply_logging_defaults(config);
    config
        .images_dir
        .get_or_insert_with(|| DEFAULT_IMAGES_DIR.to_string());
    config
}

fn apply_aws_defaults(mut config: CloudsightConfig) -> CloudsightConfig {
    let aws = config.aws.get_or_insert_with(AwsConfig::default);
    aws.region.get_or_insert_with(|| DEFAULT_REGION.to_string());
    config
}

fn apply_ocr_defaults(mut config: CloudsightConfig) -> CloudsightConfig {
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    ocr.document.get_or_insert_with(|| DEFAULT_DOCUMENT.to_string());
    ocr.cache_path.get_or_insert_with(|| DEFAULT_CACHE_PATH.to_string());
    ocr.cache_mode.get_or_insert(CacheMode::WarmOnly);
    config
}

fn apply_celebrity_defaults(mut config: CloudsightConfig) -> CloudsightConfig {
    let celebs = config
        .celebrities
        .get_or_insert_with(CelebritiesConfig::default);
    celebs
        .photos
        .get_or_insert_with(|| DEFAULT_PHOTOS.iter().map(|p| p.to_string()).collect());
    celebs
        .confidence_threshold
        .get_or_insert(DEFAULT_CONFIDENCE_THRESHOLD);
    celebs.font_path.get_or_insert_with(|| DEFAULT_FONT_PATH.to_string());
    celebs.font_size.get_or_insert(DEFAULT_FONT_SIZE);
    celebs
        .output_suffix
        .get_or_insert_with(|| DEFAULT_OUTPUT_SUFFIX.to_string());
    config
}

fn apply_logging_defaults(mut config: CloudsightConfig) -> CloudsightConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}
