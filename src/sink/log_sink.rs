//! Annotations as structured log events

use super::ObservabilitySink;
use crate::models::Annotation;
use tracing::{info, warn};

/// Log target carrying annotations
pub const ANNOTATION_TARGET: &str = "llmobs";

/// Emits each annotation as an `info` event on the `llmobs` target
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl ObservabilitySink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn annotate(&self, annotation: Annotation) {
        let metadata = match serde_json::to_string(&annotation.metadata) {
            Ok(json) => json,
            Err(e) => {
                warn!("Dropping annotation, metadata not serializable: {}", e);
                return;
            }
        };
        let tags = annotation
            .tags
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(",");

        info!(
            target: ANNOTATION_TARGET,
            input_data = %annotation.input_data,
            output_data = %annotation.output_data,
            metadata = %metadata,
            tags = %tags,
            "llm annotation"
        );
    }
}
