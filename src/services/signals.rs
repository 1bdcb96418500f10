//! Sentiment and toxicity extraction
//!
//! Both signals are one deterministic completion each, answered as a
//! single-key JSON object.

use crate::models::{CompletionRequest, SignalSet, TokenUsage};
use crate::providers::CompletionProvider;
use crate::services::prompts::{sentiment_prompt, toxicity_prompt};
use crate::services::schema::{parse_sentiment, parse_toxicity};
use crate::utils::error::{AppResult, CallSite};

/// Signal calls request deterministic decoding
pub const SIGNAL_TEMPERATURE: f32 = 0.0;

/// Signals for the question and for the answer
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSignals {
    pub input: SignalSet,
    pub output: SignalSet,
    /// Tokens spent on the four calls; not charged to the cost estimate
    pub usage: TokenUsage,
}

pub struct SignalExtractor<'a> {
    provider: &'a dyn CompletionProvider,
    model: &'a str,
}

impl<'a> SignalExtractor<'a> {
    pub fn new(provider: &'a dyn CompletionProvider, model: &'a str) -> Self {
        Self { provider, model }
    }

    /// Sentiment label, passed through without checking it against the allowed set
    pub async fn sentiment(&self, text: &str, site: CallSite) -> AppResult<(String, TokenUsage)> {
        let completion = self
            .provider
            .complete(CompletionRequest::new(self.model, sentiment_prompt(text), SIGNAL_TEMPERATURE))
            .await?;
        Ok((parse_sentiment(site, &completion.text)?, completion.usage()))
    }

    pub async fn toxicity(&self, text: &str, site: CallSite) -> AppResult<(bool, TokenUsage)> {
        let completion = self
            .provider
            .complete(CompletionRequest::new(self.model, toxicity_prompt(text), SIGNAL_TEMPERATURE))
            .await?;
        Ok((parse_toxicity(site, &completion.text)?, completion.usage()))
    }

    /// Four sequential calls: input sentiment, output sentiment, input toxicity, output toxicity
    pub async fn extract(&self, input: &str, output: &str) -> AppResult<ExtractedSignals> {
        let (input_sentiment, u1) = self.sentiment(input, CallSite::InputSentiment).await?;
        let (output_sentiment, u2) = self.sentiment(output, CallSite::OutputSentiment).await?;
        let (input_toxic, u3) = self.toxicity(input, CallSite::InputToxicity).await?;
        let (output_toxic, u4) = self.toxicity(output, CallSite::OutputToxicity).await?;

        let usage = [u1, u2, u3, u4]
            .into_iter()
            .fold(TokenUsage::default(), TokenUsage::combine);

        Ok(ExtractedSignals {
            input: SignalSet {
                sentiment: input_sentiment,
                toxic: input_toxic,
            },
            output: SignalSet {
                sentiment: output_sentiment,
                toxic: output_toxic,
            },
            usage,
        })
    }
}
