//! Annotation records sent to the observability sink

use crate::models::consulta::{CostEstimate, Evaluation, SignalSet};
use crate::services::cost::round_usd;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Everything computed for one query, write-once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Prompt sent to the answering model
    pub prompt: String,
    pub answer: String,
    pub evaluation: Evaluation,
    pub cost: CostEstimate,
    pub user_type: String,
    pub session_id: String,
    pub input_signals: SignalSet,
    pub output_signals: SignalSet,
    pub environment: String,
    pub prompt_name: String,
    /// Model that produced the answer
    pub model: String,
}

/// Wire shape of an annotate call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub input_data: String,
    pub output_data: String,
    pub metadata: BTreeMap<String, Value>,
    pub tags: BTreeMap<String, String>,
}

impl AnnotationRecord {
    /// Metadata bag: every computed field plus the static labels
    pub fn metadata(&self) -> BTreeMap<String, Value> {
        let entries = [
            ("hallucination", json!(self.evaluation.hallucination)),
            ("evaluation_score", json!(self.evaluation.score)),
            ("comentario", json!(self.evaluation.comment)),
            ("estimated_cost_usd", json!(round_usd(self.cost.usd))),
            ("input_tokens", json!(self.cost.input_tokens)),
            ("output_tokens", json!(self.cost.output_tokens)),
            ("user_type", json!(self.user_type)),
            ("input_sentiment", json!(self.input_signals.sentiment)),
            ("output_sentiment", json!(self.output_signals.sentiment)),
            ("input_toxicity", json!(self.input_signals.toxic)),
            ("output_toxicity", json!(self.output_signals.toxic)),
            ("session_id", json!(self.session_id)),
            ("prompt_name", json!(self.prompt_name)),
            ("modelo_respuesta", json!(self.model)),
        ];

        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    /// Indexable subset of the metadata, stringified
    pub fn tags(&self) -> BTreeMap<String, String> {
        let entries = [
            ("entorno", self.environment.clone()),
            ("modelo", self.model.clone()),
            // Lowercase "true"/"false", same spelling as the metadata value
            ("hallucination", self.evaluation.hallucination.to_string()),
            ("user_type", self.user_type.clone()),
            ("session_id", self.session_id.clone()),
            ("input_sentiment", self.input_signals.sentiment.clone()),
            ("output_sentiment", self.output_signals.sentiment.clone()),
        ];

        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    pub fn to_annotation(&self) -> Annotation {
        Annotation {
            input_data: self.prompt.clone(),
            output_data: self.answer.clone(),
            metadata: self.metadata(),
            tags: self.tags(),
        }
    }
}
