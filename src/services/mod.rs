//! Service layer module
//!
//! Routing, the three kinds of model calls, cost accounting and the pipeline tying them together

pub mod answerer;
pub mod cost;
pub mod evaluator;
pub mod pipeline;
pub mod prompts;
pub mod router;
pub mod schema;
pub mod signals;

pub use answerer::Answerer;
pub use cost::{cost, round_usd, CostEstimator};
pub use evaluator::{Evaluated, Evaluator};
pub use pipeline::ConsultaPipeline;
pub use router::{QueryRouter, RouteDecision};
pub use signals::{ExtractedSignals, SignalExtractor};
