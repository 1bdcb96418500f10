//! Observability sinks
//!
//! A sink receives one annotation per query. Calls are fire-and-forget: a sink
//! never reports failure back to the pipeline. Deliveries still in flight are
//! drained by `flush` before the process exits.

pub mod http;
pub mod log_sink;
pub mod noop;

use crate::config::{ObservabilityConfig, SinkKind};
use crate::models::Annotation;
use crate::utils::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use http::HttpSink;
pub use log_sink::TracingSink;
pub use noop::NoopSink;

/// Outcome of draining a sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub delivered: usize,
    pub failed: usize,
    /// Deliveries abandoned when the timeout ran out
    pub abandoned: usize,
}

/// Destination for annotation records
#[async_trait]
pub trait ObservabilitySink: Send + Sync {
    /// Get the sink name
    fn name(&self) -> &str;

    /// Hand over an annotation; returns without waiting for delivery
    fn annotate(&self, annotation: Annotation);

    /// Wait up to `timeout` for pending deliveries. Failures are counted, never returned.
    async fn flush(&self, _timeout: Duration) -> FlushStats {
        FlushStats::default()
    }
}

/// Build the configured sink, once per process
pub fn init(config: &ObservabilityConfig) -> AppResult<Arc<dyn ObservabilitySink>> {
    let sink: Arc<dyn ObservabilitySink> = match config.sink {
        SinkKind::Tracing => Arc::new(TracingSink::new()),
        SinkKind::Http => Arc::new(HttpSink::from_config(config)?),
        SinkKind::None => Arc::new(NoopSink),
    };

    info!("Observability sink enabled: {}", sink.name());
    Ok(sink)
}
