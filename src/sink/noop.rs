use super::ObservabilitySink;
use crate::models::Annotation;

/// Discards every annotation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ObservabilitySink for NoopSink {
    fn name(&self) -> &str {
        "noop"
    }

    fn annotate(&self, _annotation: Annotation) {}
}
