//! Answer evaluation
//!
//! A second model scores the answer and flags hallucinations. The evaluator
//! model and temperature are fixed, whichever model wrote the answer.

use crate::models::{CompletionRequest, Evaluation, TokenUsage};
use crate::providers::CompletionProvider;
use crate::services::prompts::evaluation_prompt;
use crate::services::schema::parse_evaluation;
use crate::utils::error::AppResult;
use tracing::debug;

/// Evaluator sampling temperature
pub const EVALUATION_TEMPERATURE: f32 = 0.1;

/// Evaluation plus the tokens the evaluation call consumed
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub evaluation: Evaluation,
    pub usage: TokenUsage,
}

pub struct Evaluator<'a> {
    provider: &'a dyn CompletionProvider,
    model: &'a str,
}

impl<'a> Evaluator<'a> {
    pub fn new(provider: &'a dyn CompletionProvider, model: &'a str) -> Self {
        Self { provider, model }
    }

    pub async fn evaluate(&self, question: &str, answer: &str) -> AppResult<Evaluated> {
        let request = CompletionRequest::new(
            self.model,
            evaluation_prompt(question, answer),
            EVALUATION_TEMPERATURE,
        );
        let completion = self.provider.complete(request).await?;
        let evaluation = parse_evaluation(&completion.text)?;

        debug!(
            "Evaluation: score={} hallucination={}",
            evaluation.score, evaluation.hallucination
        );

        Ok(Evaluated {
            evaluation,
            usage: completion.usage(),
        })
    }
}
