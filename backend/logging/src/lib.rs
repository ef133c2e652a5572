//! Structured logging for the cloudsight pipelines.
//!
//! Handles subscriber setup (console plus optional rolling NDJSON file),
//! redaction of credentials in service error bodies, and pipeline event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, PipelineEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
