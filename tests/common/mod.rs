//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use legal_llmobs::config::{ModelSettings, ObservabilityConfig, PricingConfig};
use legal_llmobs::models::{Annotation, CompletionRequest, CompletionResult};
use legal_llmobs::providers::CompletionProvider;
use legal_llmobs::sink::ObservabilitySink;
use legal_llmobs::utils::error::{AppError, AppResult};
use legal_llmobs::ConsultaPipeline;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const EVALUATION_OK: &str =
    r#"{"evaluation_score": 0.85, "hallucination": false, "comentario": "Respuesta correcta."}"#;
pub const EVALUATION_FABRICATED: &str =
    r#"{"evaluation_score": 0.1, "hallucination": true, "comentario": "La ley citada no existe."}"#;

pub fn sentiment(label: &str) -> String {
    format!(r#"{{"sentimiento": "{}"}}"#, label)
}

pub fn toxicity(toxic: bool) -> String {
    format!(r#"{{"toxico": {}}}"#, toxic)
}

/// Provider answering from a fixed script and recording every request
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<AppResult<CompletionResult>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>, prompt_tokens: u32, completion_tokens: u32) -> Self {
        self.replies.lock().unwrap().push_back(Ok(CompletionResult {
            text: text.into(),
            prompt_tokens,
            completion_tokens,
        }));
        self
    }

    pub fn fail(self, error: AppError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Answer, evaluation and four signal replies of a well-behaved run
    pub fn happy_path(answer: &str, evaluation: &str) -> Self {
        Self::new()
            .reply(answer, 1000, 500)
            .reply(evaluation, 300, 50)
            .reply(sentiment("neutral"), 40, 8)
            .reply(sentiment("positivo"), 60, 8)
            .reply(toxicity(false), 40, 6)
            .reply(toxicity(false), 60, 6)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> AppResult<CompletionResult> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Internal("script exhausted".to_string())))
    }
}

/// Sink keeping every annotation in memory
#[derive(Default)]
pub struct RecordingSink {
    annotations: Mutex<Vec<Annotation>>,
}

impl RecordingSink {
    pub fn annotations(&self) -> Vec<Annotation> {
        self.annotations.lock().unwrap().clone()
    }
}

impl ObservabilitySink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn annotate(&self, annotation: Annotation) {
        self.annotations.lock().unwrap().push(annotation);
    }
}

pub fn pipeline(provider: Arc<ScriptedProvider>, sink: Arc<RecordingSink>) -> ConsultaPipeline {
    ConsultaPipeline::new(
        provider,
        sink,
        ModelSettings::default(),
        PricingConfig::default(),
        ObservabilityConfig::default(),
    )
}
