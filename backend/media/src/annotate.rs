use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::{debug, info, warn};

use cloudsight_core::FaceRecord;
use cloudsight_logging::{EventLogger, PipelineEvent};

use crate::error::AnnotateError;
use crate::geometry::{plan_overlays, Overlay, PixelRect, CONFIDENCE_THRESHOLD};

/// Suffix appended to the file stem of annotated copies.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-resultado";

#[derive(Debug, Clone)]
pub struct AnnotationStyle {
    pub outline: Rgb<u8>,
    /// Drawn inward from the rectangle edges.
    pub outline_width: u32,
    pub label_fill: Rgb<u8>,
    pub label_text: Rgb<u8>,
    pub font_size: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            outline: Rgb([255, 0, 0]),
            outline_width: 3,
            label_fill: Rgb([255, 0, 0]),
            label_text: Rgb([255, 255, 255]),
            font_size: 20.0,
        }
    }
}

/// Result of writing one annotated image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Faces drawn (above the threshold).
    pub drawn: usize,
    /// Faces at or below the threshold.
    pub skipped: usize,
}

/// Draws face rectangles and name labels onto copies of source images.
pub struct Annotator {
    style: AnnotationStyle,
    threshold: f64,
    font: Option<FontVec>,
}

impl Annotator {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            style,
            threshold: CONFIDENCE_THRESHOLD,
            font: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    /// Read a TrueType/OpenType font from disk.
    pub fn load_font(path: &Path) -> Result<FontVec, AnnotateError> {
        let data = std::fs::read(path)
            .map_err(|e| AnnotateError::Font(format!("{}: {}", path.display(), e)))?;
        FontVec::try_from_vec(data)
            .map_err(|e| AnnotateError::Font(format!("{}: {}", path.display(), e)))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every face above the threshold onto `image`; returns how many were drawn.
    pub fn draw(&self, image: &mut RgbImage, faces: &[FaceRecord]) -> usize {
        let overlays = plan_overlays(faces, image.width(), image.height(), self.threshold);
        for overlay in &overlays {
            self.draw_outline(image, &overlay.rect);
            self.draw_label(image, overlay);
        }
        overlays.len()
    }

    /// Decode `source`, draw `faces`, and encode the result to `output`.
    ///
    /// The output is written even when no face clears the threshold.
    pub fn annotate(
        &self,
        source: &Path,
        output: &Path,
        faces: &[FaceRecord],
    ) -> Result<AnnotationSummary, AnnotateError> {
        if same_file(source, output) {
            return Err(AnnotateError::SameAsSource(source.to_path_buf()));
        }

        let mut image = image::open(source)?.to_rgb8();
        let drawn = self.draw(&mut image, faces);
        image.save(output)?;

        info!(
            source = %source.display(),
            output = %output.display(),
            drawn,
            "Wrote annotated image"
        );
        EventLogger::log_event(
            "celebrities",
            PipelineEvent::AnnotationWritten {
                output: output.display().to_string(),
                overlays: drawn,
            },
        );

        Ok(AnnotationSummary {
            output: output.to_path_buf(),
            width: image.width(),
            height: image.height(),
            drawn,
            skipped: faces.len() - drawn,
        })
    }

    fn draw_outline(&self, image: &mut RgbImage, rect: &PixelRect) {
        for i in 0..self.style.outline_width as i32 {
            let Some(r) = rect.inset(i) else { break };
            let ring = Rect::at(r.left, r.top).of_size(r.width(), r.height());
            draw_hollow_rect_mut(image, ring, self.style.outline);
        }
    }

    fn draw_label(&self, image: &mut RgbImage, overlay: &Overlay) {
        let Some(font) = &self.font else {
            warn!(label = %overlay.label, "No font loaded; label not drawn");
            return;
        };
        if overlay.label.is_empty() {
            return;
        }

        let scale = PxScale::from(self.style.font_size);
        let (x, y) = overlay.label_origin(self.style.font_size);
        let (w, h) = text_size(scale, font, &overlay.label);
        if w > 0 && h > 0 {
            draw_filled_rect_mut(image, Rect::at(x, y).of_size(w, h), self.style.label_fill);
        }
        draw_text_mut(image, self.style.label_text, x, y, scale, font, &overlay.label);
        debug!(label = %overlay.label, x, y, "Drew label");
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(AnnotationStyle::default())
    }
}

/// `<dir>/<stem><suffix>.<ext>` next to `source`; extension defaults to `jpg`.
pub fn annotated_output_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jpg".to_string());
    source.with_file_name(format!("{}{}.{}", stem, suffix, ext))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
