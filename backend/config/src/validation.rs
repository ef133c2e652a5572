//! Config validation with field paths in every message.

use crate::schema::CloudsightConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &CloudsightConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_aws(config, &mut report);
    validate_celebrities(config, &mut report);
    report
}

fn validate_aws(config: &CloudsightConfig, report: &mut ValidationReport) {
    let Some(aws) = &config.aws else { return };
    if let Some(region) = &aws.region {
        if region.trim().is_empty() {
            report.error("aws.region", "Region must not be empty");
        }
    }
    for (path, endpoint) in [
        ("aws.textractEndpoint", &aws.textract_endpoint),
        ("aws.rekognitionEndpoint", &aws.rekognition_endpoint),
    ] {
        if let Some(url) = endpoint {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                report.error(path, format!("Endpoint must be an http(s) URL, got '{url}'"));
            }
        }
    }
}

/// A confidence threshold is a percentage; NaN is rejected too.
pub fn check_confidence_threshold(threshold: f64) -> Result<(), String> {
    if (0.0..=100.0).contains(&threshold) {
        Ok(())
    } else {
        Err(format!("Threshold must be within 0..=100, got {threshold}"))
    }
}

fn validate_celebrities(config: &CloudsightConfig, report: &mut ValidationReport) {
    let Some(celebs) = &config.celebrities else { return };
    if let Some(threshold) = celebs.confidence_threshold {
        if let Err(message) = check_confidence_threshold(threshold) {
            report.error("celebrities.confidenceThreshold", message);
        }
    }
    if let Some(size) = celebs.font_size {
        if size <= 0.0 {
            report.error("celebrities.fontSize", "Font size must be positive");
        }
    }
    if let Some(photos) = &celebs.photos {
        if photos.is_empty() {
            report.warn("celebrities.photos", "No photos configured; nothing to annotate");
        }
    }
    if let Some(suffix) = &celebs.output_suffix {
        if suffix.is_empty() {
            report.error(
                "celebrities.outputSuffix",
                "Suffix must not be empty; annotated copies would replace their sources",
            );
        }
    }
}
