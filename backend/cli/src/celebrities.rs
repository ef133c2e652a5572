//! Celebrity pipeline: recognize each photo, then write an annotated copy.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cloudsight_core::{RecognitionRequest, RecognitionService};
use cloudsight_logging::{EventLogger, PipelineEvent};
use cloudsight_media::{annotated_output_path, Annotator};
use cloudsight_understanding::extract_faces;
use tracing::{error, info};

use crate::settings::Settings;

/// What happened to one photo.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoOutcome {
    Annotated { output: PathBuf, drawn: usize },
    NoResults,
    ServiceFailed(String),
}

/// Process `settings.photos` one after another, printing a status line per photo.
pub async fn run(
    settings: &Settings,
    service: &dyn RecognitionService,
    annotator: &Annotator,
    out: &mut impl Write,
) -> Result<Vec<PhotoOutcome>> {
    let mut outcomes = Vec::with_capacity(settings.photos.len());

    for photo in &settings.photos {
        let request = RecognitionRequest::from_file(photo).await?;
        EventLogger::log_event(
            "celebrities",
            PipelineEvent::ServiceCall {
                operation: "RecognizeCelebrities".into(),
                source: photo.display().to_string(),
                bytes: request.len(),
            },
        );

        let response = match service.recognize_celebrities(&request).await {
            Ok(response) => response,
            Err(e) if e.is_service() => {
                error!(photo = %photo.display(), error = %e, "Celebrity recognition failed");
                EventLogger::log_event(
                    "celebrities",
                    PipelineEvent::ServiceFailure {
                        operation: "RecognizeCelebrities".into(),
                        source: photo.display().to_string(),
                        error_msg: e.to_string(),
                    },
                );
                writeln!(out, "error processing image: {}: {}", photo.display(), e)?;
                outcomes.push(PhotoOutcome::ServiceFailed(e.to_string()));
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if response.celebrity_faces.is_empty() {
            writeln!(out, "no results found for image: {}", photo.display())?;
            outcomes.push(PhotoOutcome::NoResults);
            continue;
        }

        let faces = extract_faces(&response);
        let output = annotated_output_path(photo, &settings.output_suffix);
        let summary = annotator
            .annotate(photo, &output, &faces)
            .with_context(|| format!("Failed to annotate {}", photo.display()))?;

        writeln!(out, "saved annotated image at: {}", output.display())?;
        outcomes.push(PhotoOutcome::Annotated {
            output,
            drawn: summary.drawn,
        });
    }

    info!(photos = outcomes.len(), "Celebrity run finished");
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsight_config::{apply_all_defaults, CloudsightConfig};
    use cloudsight_core::{BoundingBox, Celebrity, ComparedFace, RecognizeCelebritiesResponse};
    use cloudsight_understanding::MockVisionService;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn settings_with_photos(dir: &Path, names: &[&str]) -> Settings {
        let mut settings = Settings::from_config(&apply_all_defaults(CloudsightConfig::default()));
        settings.photos = names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                RgbImage::from_pixel(50, 40, Rgb([255, 255, 255]))
                    .save(&path)
                    .unwrap();
                path
            })
            .collect();
        settings
    }

    fn response(confidence: f64) -> RecognizeCelebritiesResponse {
        RecognizeCelebritiesResponse {
            celebrity_faces: vec![Celebrity {
                name: Some("Neymar".into()),
                match_confidence: Some(confidence),
                face: Some(ComparedFace {
                    bounding_box: Some(BoundingBox::new(0.2, 0.25, 0.4, 0.5)),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn annotates_each_photo_with_results() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_photos(dir.path(), &["bbc.png", "msn.png"]);
        let service = MockVisionService::default().with_celebrities(response(99.0));

        let mut out = Vec::new();
        let outcomes = run(&settings, &service, &Annotator::default(), &mut out)
            .await
            .unwrap();

        let expected = dir.path().join("bbc-resultado.png");
        assert_eq!(
            outcomes[0],
            PhotoOutcome::Annotated {
                output: expected.clone(),
                drawn: 1
            }
        );
        assert!(expected.exists());
        assert!(dir.path().join("msn-resultado.png").exists());
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&format!("saved annotated image at: {}", expected.display())));
        assert_eq!(service.calls(), 2);
    }

    #[tokio::test]
    async fn photo_without_celebrities_is_reported_and_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_photos(dir.path(), &["vazio.png"]);
        let service = MockVisionService::default();

        let mut out = Vec::new();
        let outcomes = run(&settings, &service, &Annotator::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(outcomes, vec![PhotoOutcome::NoResults]);
        assert!(!dir.path().join("vazio-resultado.png").exists());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("no results found for image: {}\n", settings.photos[0].display())
        );
    }

    #[tokio::test]
    async fn low_confidence_faces_still_produce_an_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_photos(dir.path(), &["torcida.png"]);
        let service = MockVisionService::default().with_celebrities(response(90.0));

        let mut out = Vec::new();
        let outcomes = run(&settings, &service, &Annotator::default(), &mut out)
            .await
            .unwrap();

        let output = dir.path().join("torcida-resultado.png");
        assert_eq!(outcomes, vec![PhotoOutcome::Annotated { output: output.clone(), drawn: 0 }]);
        let written = image::open(&output).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (50, 40));
    }

    #[tokio::test]
    async fn service_failure_skips_photo_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_with_photos(dir.path(), &["a.png", "b.png"]);
        let service = MockVisionService::default().failing("InvalidImageFormatException", "bad");

        let mut out = Vec::new();
        let outcomes = run(&settings, &service, &Annotator::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[1], PhotoOutcome::ServiceFailed(_)));
        assert_eq!(service.calls(), 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[tokio::test]
    async fn missing_photo_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings_with_photos(dir.path(), &[]);
        settings.photos = vec![dir.path().join("nope.jpg")];
        let service = MockVisionService::default();

        let mut out = Vec::new();
        assert!(run(&settings, &service, &Annotator::default(), &mut out)
            .await
            .is_err());
        assert_eq!(service.calls(), 0);
    }
}
