//! Shared wiring for the `ocr-lines` and `celebrity-boxes` binaries.

pub mod celebrities;
pub mod ocr;
pub mod settings;

pub use settings::{parse_threshold, Settings};
