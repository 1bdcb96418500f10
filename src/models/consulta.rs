//! Query, routing and result types of a legal consultation

use crate::config::ModelSettings;
use serde::{Deserialize, Serialize};

/// Default user type when the caller gives none
pub const DEFAULT_USER_TYPE: &str = "test_user";

/// Default session id when the caller gives none
pub const DEFAULT_SESSION_ID: &str = "demo_session";

/// A legal question plus the labels it is annotated with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub user_type: String,
    pub session_id: String,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_type: DEFAULT_USER_TYPE.to_string(),
            session_id: DEFAULT_SESSION_ID.to_string(),
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = user_type.into();
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

/// Which answering path a query takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// Strong model, neutral lawyer prompt
    Primary,
    /// Weaker model, fabrication-inducing prompt
    Fallback,
}

impl ModelChoice {
    /// Sampling temperature bound to the choice
    pub fn temperature(&self) -> f32 {
        match self {
            ModelChoice::Primary => 0.2,
            ModelChoice::Fallback => 0.7,
        }
    }

    /// Model identifier bound to the choice
    pub fn model<'a>(&self, models: &'a ModelSettings) -> &'a str {
        match self {
            ModelChoice::Primary => &models.primary,
            ModelChoice::Fallback => &models.fallback,
        }
    }
}

/// Evaluator verdict on an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Quality score, nominally in [0, 1]; not clamped
    pub score: f64,
    pub hallucination: bool,
    pub comment: String,
}

/// Sentiment and toxicity of one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    /// Whatever label the model returned (`positivo`, `negativo`, `neutral`, ...)
    pub sentiment: String,
    pub toxic: bool,
}

/// Tokens charged to a query and their price
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Unrounded USD amount
    pub usd: f64,
}

/// Result of `consulta_legal`, keyed the way callers of the demo expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultaResult {
    #[serde(rename = "pregunta")]
    pub question: String,
    #[serde(rename = "respuesta")]
    pub answer: String,
    pub evaluation_score: f64,
    pub hallucination: bool,
    /// Rounded to 5 decimals
    pub estimated_cost_usd: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(rename = "comentario")]
    pub comment: String,
    pub input_sentiment: String,
    pub output_sentiment: String,
    pub input_toxicity: bool,
    pub output_toxicity: bool,
    #[serde(rename = "modelo_respuesta")]
    pub model: String,
}
