//! Pure overlay planning: thresholding and normalized → pixel conversion.

use cloudsight_core::{BoundingBox, FaceRecord};

/// Faces must score strictly above this to be drawn.
pub const CONFIDENCE_THRESHOLD: f64 = 90.0;

pub fn passes_threshold(confidence: f64, threshold: f64) -> bool {
    confidence > threshold
}

/// Absolute pixel rectangle; `right` and `bottom` are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Scale a normalized box to a `width` × `height` image, truncating toward zero.
    pub fn from_normalized(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        Self {
            left: (bbox.left * w) as i32,
            top: (bbox.top * h) as i32,
            right: ((bbox.left + bbox.width) * w) as i32,
            bottom: ((bbox.top + bbox.height) * h) as i32,
        }
    }

    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.left, self.top, self.right, self.bottom)
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left + 1).max(1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top + 1).max(1) as u32
    }

    /// Shrink by `by` pixels on every side; `None` once the rectangle collapses.
    pub fn inset(&self, by: i32) -> Option<Self> {
        let inner = Self {
            left: self.left + by,
            top: self.top + by,
            right: self.right - by,
            bottom: self.bottom - by,
        };
        (inner.left <= inner.right && inner.top <= inner.bottom).then_some(inner)
    }
}

/// One face that will be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub rect: PixelRect,
    pub label: String,
    pub confidence: f64,
}

impl Overlay {
    /// Top-left corner of the label, sitting right above the rectangle.
    pub fn label_origin(&self, font_size: f32) -> (i32, i32) {
        (self.rect.left, self.rect.top - font_size as i32)
    }
}

/// Faces above `threshold`, converted to pixels, in input order.
pub fn plan_overlays(faces: &[FaceRecord], width: u32, height: u32, threshold: f64) -> Vec<Overlay> {
    faces
        .iter()
        .filter(|f| passes_threshold(f.confidence, threshold))
        .map(|f| Overlay {
            rect: PixelRect::from_normalized(&f.bounding_box, width, height),
            label: f.label.clone(),
            confidence: f.confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_normalized_box_exactly() {
        let bbox = BoundingBox::new(0.1, 0.2, 0.3, 0.4);
        let rect = PixelRect::from_normalized(&bbox, 1000, 500);
        assert_eq!(rect.as_tuple(), (100, 100, 400, 300));
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!passes_threshold(90.0, CONFIDENCE_THRESHOLD));
        assert!(!passes_threshold(42.0, CONFIDENCE_THRESHOLD));
        assert!(passes_threshold(90.01, CONFIDENCE_THRESHOLD));
        assert!(passes_threshold(100.0, CONFIDENCE_THRESHOLD));
    }

    #[test]
    fn plan_skips_faces_at_or_below_threshold() {
        let bbox = BoundingBox::new(0.0, 0.0, 0.5, 0.5);
        let faces = vec![
            FaceRecord::new(bbox, "exact", 90.0),
            FaceRecord::new(bbox, "above", 99.2),
            FaceRecord::new(bbox, "below", 10.0),
            FaceRecord::new(bbox, "also above", 91.0),
        ];
        let labels: Vec<_> = plan_overlays(&faces, 200, 100, CONFIDENCE_THRESHOLD)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["above", "also above"]);
    }

    #[test]
    fn inset_collapses_small_rects() {
        let rect = PixelRect { left: 10, top: 10, right: 13, bottom: 30 };
        assert_eq!(rect.inset(1), Some(PixelRect { left: 11, top: 11, right: 12, bottom: 29 }));
        assert_eq!(rect.inset(2), None);
    }

    #[test]
    fn label_sits_above_rect() {
        let overlay = Overlay {
            rect: PixelRect { left: 100, top: 100, right: 400, bottom: 300 },
            label: "Neymar".into(),
            confidence: 99.0,
        };
        assert_eq!(overlay.label_origin(20.0), (100, 80));
    }

    #[test]
    fn degenerate_box_still_has_positive_size() {
        let rect = PixelRect::from_normalized(&BoundingBox::default(), 640, 480);
        assert_eq!(rect.width(), 1);
        assert_eq!(rect.height(), 1);
    }
}
