//! OpenAI Provider implementation
//!
//! Standard OpenAI-compatible chat completion API

use super::CompletionProvider;
use crate::config::OpenAIConfig;
use crate::models::openai::*;
use crate::models::{CompletionRequest, CompletionResult};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::create_request_log_summary;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error};

/// OpenAI Provider
#[derive(Debug, Clone)]
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIProvider {
    /// Create a provider from the OpenAI settings
    pub fn new(config: &OpenAIConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("legal-llmobs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the request URL
    fn build_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Map a non-success response onto the error taxonomy
    fn map_error_status(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<OpenAIErrorResponse>(body)
            .map(|parsed| parsed.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::TOO_MANY_REQUESTS => AppError::RateLimit,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Authentication(message),
            _ => AppError::ExternalApi(format!("{} - {}", status, message)),
        }
    }

    fn map_transport_error(err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Timeout
        } else {
            AppError::HttpClient(err)
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> AppResult<CompletionResult> {
        let wire_request = OpenAIRequest {
            model: request.model.clone(),
            messages: vec![OpenAIMessage::user(request.prompt)],
            temperature: request.temperature,
        };

        if let Ok(summary) = serde_json::to_string(&create_request_log_summary(&wire_request)) {
            debug!("Sending OpenAI chat completion request: {}", summary);
        }

        let response = self
            .client
            .post(self.build_url())
            .bearer_auth(&self.api_key)
            .json(&wire_request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API request failed: {} - {}", status, error_text);
            return Err(Self::map_error_status(status, &error_text));
        }

        let openai_response: OpenAIResponse =
            response.json().await.map_err(Self::map_transport_error)?;

        let text = openai_response
            .first_content()
            .ok_or_else(|| AppError::EmptyCompletion {
                model: request.model.clone(),
            })?
            .to_string();

        debug!(
            "OpenAI request completed: model={} prompt_tokens={} completion_tokens={}",
            request.model,
            openai_response.usage.prompt_tokens,
            openai_response.usage.completion_tokens
        );

        Ok(CompletionResult {
            text,
            prompt_tokens: openai_response.usage.prompt_tokens,
            completion_tokens: openai_response.usage.completion_tokens,
        })
    }
}
