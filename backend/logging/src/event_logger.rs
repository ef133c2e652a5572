//! Pipeline Event Logger
//!
//! One structured record per externally visible step (service call, cache
//! hit, annotated image written), emitted under the `pipeline_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    ServiceCall {
        operation: String,
        source: String,
        bytes: usize,
    },
    ServiceFailure {
        operation: String,
        source: String,
        error_msg: String,
    },
    CacheHit {
        path: String,
    },
    CacheWarmed {
        path: String,
    },
    AnnotationWritten {
        output: String,
        overlays: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub pipeline: String,
    pub timestamp: DateTime<Utc>,
    pub event: PipelineEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the entry for `event`, scrubbing free-form error text.
    pub fn entry(pipeline: &str, mut event: PipelineEvent) -> EventLogEntry {
        if let PipelineEvent::ServiceFailure { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }

        EventLogEntry {
            pipeline: pipeline.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(pipeline: &str, event: PipelineEvent) {
        let entry = Self::entry(pipeline, event);
        info!(target: "pipeline_events", event = ?entry, "Pipeline event");
    }
}
