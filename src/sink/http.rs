//! Collector sink
//!
//! Posts annotations as JSON to `{collector_url}/annotations`

use super::{FlushStats, ObservabilitySink};
use crate::config::ObservabilityConfig;
use crate::models::Annotation;
use crate::utils::error::{AppError, AppResult};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct CollectorPayload<'a> {
    #[serde(flatten)]
    annotation: &'a Annotation,
    timestamp: String,
}

/// Deliveries spawned by `annotate`; each task yields whether it succeeded
#[derive(Default)]
struct Pending {
    tasks: JoinSet<bool>,
    /// Outcomes of tasks reaped before the next flush
    settled: FlushStats,
}

impl Pending {
    fn reap_finished(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            match joined {
                Ok(true) => self.settled.delivered += 1,
                _ => self.settled.failed += 1,
            }
        }
    }
}

#[derive(Clone)]
pub struct HttpSink {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    pending: Arc<Mutex<Pending>>,
}

impl HttpSink {
    pub fn new(collector_url: &str, api_key: Option<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create collector HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/annotations", collector_url.trim_end_matches('/')),
            api_key,
            pending: Arc::new(Mutex::new(Pending::default())),
        })
    }

    pub fn from_config(config: &ObservabilityConfig) -> AppResult<Self> {
        let url = config
            .collector_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("LLMOBS_COLLECTOR_URL is required for the http sink"))?;
        Self::new(url, config.collector_api_key.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Deliveries spawned and not yet collected by `flush`
    pub fn pending_len(&self) -> usize {
        self.lock_pending().tasks.len()
    }

    fn lock_pending(&self) -> MutexGuard<'_, Pending> {
        // A panic while holding the lock leaves the set itself intact
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_pending(&self) -> Pending {
        std::mem::take(&mut *self.lock_pending())
    }

    /// Deliver one annotation and wait for the collector's answer
    pub async fn send(&self, annotation: &Annotation) -> AppResult<()> {
        let payload = CollectorPayload {
            annotation,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "collector returned {} - {}",
                status, body
            )));
        }

        debug!("Annotation delivered to {}", self.endpoint);
        Ok(())
    }
}

#[async_trait]
impl ObservabilitySink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    fn annotate(&self, annotation: Annotation) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available, annotation dropped");
                return;
            }
        };

        let sink = self.clone();
        let mut pending = self.lock_pending();
        pending.reap_finished();
        pending.tasks.spawn_on(
            async move {
                match sink.send(&annotation).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Failed to deliver annotation: {}", e);
                        false
                    }
                }
            },
            &handle,
        );
    }

    async fn flush(&self, timeout: Duration) -> FlushStats {
        let Pending {
            mut tasks,
            settled: mut stats,
        } = self.take_pending();

        let drained = tokio::time::timeout(timeout, async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(true) => stats.delivered += 1,
                    _ => stats.failed += 1,
                }
            }
        })
        .await;

        if drained.is_err() {
            stats.abandoned = tasks.len();
            warn!(
                "Flush timed out after {:?}, abandoning {} annotation deliveries",
                timeout, stats.abandoned
            );
            tasks.abort_all();
        }

        info!(
            "Annotation sink flushed: delivered={} failed={} abandoned={}",
            stats.delivered, stats.failed, stats.abandoned
        );
        stats
    }
}
