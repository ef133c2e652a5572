//! Face overlays on images: pure geometry plus the drawing annotator.

pub mod annotate;
pub mod error;
pub mod geometry;

pub use annotate::{annotated_output_path, AnnotationStyle, AnnotationSummary, Annotator};
pub use error::AnnotateError;
pub use geometry::{passes_threshold, plan_overlays, Overlay, PixelRect, CONFIDENCE_THRESHOLD};
