//! Answer generation

use crate::models::{CompletionRequest, CompletionResult};
use crate::providers::CompletionProvider;
use crate::utils::error::AppResult;
use tracing::debug;

/// Issues the answering call
pub struct Answerer<'a> {
    provider: &'a dyn CompletionProvider,
}

impl<'a> Answerer<'a> {
    pub fn new(provider: &'a dyn CompletionProvider) -> Self {
        Self { provider }
    }

    /// One completion with the routed prompt; text and usage come back unmodified
    pub async fn answer(&self, prompt: &str, model: &str, temperature: f32) -> AppResult<CompletionResult> {
        debug!("Requesting answer from {} at temperature {}", model, temperature);
        self.provider
            .complete(CompletionRequest::new(model, prompt, temperature))
            .await
    }
}
