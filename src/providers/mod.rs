//! Provider module
//!
//! Defines the completion provider trait and its OpenAI implementation

pub mod openai;

use crate::models::{CompletionRequest, CompletionResult};
use crate::utils::error::AppResult;
use async_trait::async_trait;

/// Completion provider
///
/// Every pipeline stage issues its model calls through this trait, one request
/// at a time. Implementations do not retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Send a single-message chat completion
    async fn complete(&self, request: CompletionRequest) -> AppResult<CompletionResult>;
}

pub use openai::OpenAIProvider;
