//! Consultation pipeline
//!
//! `Route → Answer → Evaluate → ExtractSignals(×4) → EstimateCost → Annotate`.
//! Each step runs after the previous one finishes; the first error ends the
//! query and nothing is annotated or returned.

use crate::config::{ModelSettings, ObservabilityConfig, PricingConfig, Settings};
use crate::models::{AnnotationRecord, ConsultaResult, Query};
use crate::providers::{CompletionProvider, OpenAIProvider};
use crate::services::answerer::Answerer;
use crate::services::cost::{round_usd, CostEstimator};
use crate::services::evaluator::Evaluator;
use crate::services::router::QueryRouter;
use crate::services::signals::SignalExtractor;
use crate::sink::{self, FlushStats, ObservabilitySink};
use crate::utils::error::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

pub struct ConsultaPipeline {
    provider: Arc<dyn CompletionProvider>,
    sink: Arc<dyn ObservabilitySink>,
    router: QueryRouter,
    pricing: PricingConfig,
    labels: ObservabilityConfig,
}

impl ConsultaPipeline {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        sink: Arc<dyn ObservabilitySink>,
        models: ModelSettings,
        pricing: PricingConfig,
        labels: ObservabilityConfig,
    ) -> Self {
        Self {
            provider,
            sink,
            router: QueryRouter::new(models),
            pricing,
            labels,
        }
    }

    /// OpenAI provider and the configured sink
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let provider = Arc::new(OpenAIProvider::new(&settings.openai)?);
        let sink = sink::init(&settings.llmobs)?;

        Ok(Self::new(
            provider,
            sink,
            settings.models.clone(),
            settings.pricing,
            settings.llmobs.clone(),
        ))
    }

    pub fn router(&self) -> &QueryRouter {
        &self.router
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    /// Wait for annotations still on their way to the sink
    pub async fn flush(&self, timeout: Duration) -> FlushStats {
        self.sink.flush(timeout).await
    }

    /// Answer, evaluate and annotate one legal question
    pub async fn consulta_legal(&self, query: &Query) -> AppResult<ConsultaResult> {
        let span = info_span!("consulta_legal", session_id = %query.session_id, user_type = %query.user_type);
        self.run(query).instrument(span).await
    }

    async fn run(&self, query: &Query) -> AppResult<ConsultaResult> {
        let provider = self.provider.as_ref();
        let models = self.router.models();

        let route = self.router.select(&query.text);
        info!("Answering with {} ({:?} path)", route.model, route.choice);

        let answer = Answerer::new(provider)
            .answer(&route.prompt, &route.model, route.temperature)
            .await?;

        let evaluated = Evaluator::new(provider, &models.evaluator)
            .evaluate(&query.text, &answer.text)
            .await?;

        let signals = SignalExtractor::new(provider, &models.signals)
            .extract(&query.text, &answer.text)
            .await?;
        debug!(
            "Signal extraction used {} prompt and {} completion tokens, not included in the estimate",
            signals.usage.prompt_tokens, signals.usage.completion_tokens
        );

        let mut estimator = CostEstimator::new(self.pricing);
        estimator.charge(answer.usage()).charge(evaluated.usage);
        let cost = estimator.estimate();

        let record = AnnotationRecord {
            prompt: route.prompt,
            answer: answer.text,
            evaluation: evaluated.evaluation,
            cost,
            user_type: query.user_type.clone(),
            session_id: query.session_id.clone(),
            input_signals: signals.input,
            output_signals: signals.output,
            environment: self.labels.environment.clone(),
            prompt_name: self.labels.prompt_name.clone(),
            model: route.model,
        };

        self.sink.annotate(record.to_annotation());

        info!(
            "Consultation done: score={} hallucination={} cost_usd={:.5}",
            record.evaluation.score,
            record.evaluation.hallucination,
            record.cost.usd
        );

        Ok(ConsultaResult {
            question: query.text.clone(),
            answer: record.answer,
            evaluation_score: record.evaluation.score,
            hallucination: record.evaluation.hallucination,
            estimated_cost_usd: round_usd(record.cost.usd),
            input_tokens: record.cost.input_tokens,
            output_tokens: record.cost.output_tokens,
            comment: record.evaluation.comment,
            input_sentiment: record.input_signals.sentiment,
            output_sentiment: record.output_signals.sentiment,
            input_toxicity: record.input_signals.toxic,
            output_toxicity: record.output_signals.toxic,
            model: record.model,
        })
    }
}
