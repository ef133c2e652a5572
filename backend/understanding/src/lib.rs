pub mod aws;
pub mod cache;
pub mod extract;
pub mod mock;
pub mod sigv4;

pub use aws::{is_aws_endpoint, AwsVisionClient};
pub use cache::{load_document_text, ResponseCache};
pub use extract::{extract, extract_faces, extract_lines, Extracted};
pub use mock::MockVisionService;
pub use sigv4::Credentials;
