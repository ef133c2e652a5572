use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("font error: {0}")]
    Font(String),

    #[error("refusing to overwrite source image {}", .0.display())]
    SameAsSource(PathBuf),
}
