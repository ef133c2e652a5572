pub mod error;
pub mod request;
pub mod traits;
pub mod types;

pub use error::VisionError;
pub use request::RecognitionRequest;
pub use traits::RecognitionService;
pub use types::{
    Block, BlockType, BoundingBox, CacheMode, Celebrity, ComparedFace, DetectDocumentTextResponse,
    DocumentMetadata, Emotion, FaceRecord, RecognitionResponse, RecognizeCelebritiesResponse,
    ResponseKind, Smile,
};
