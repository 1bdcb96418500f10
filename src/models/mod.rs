//! Data models module
//!
//! OpenAI wire structures, completion call types and the consultation domain

pub mod annotation;
pub mod completion;
pub mod consulta;
pub mod openai;

pub use annotation::{Annotation, AnnotationRecord};
pub use completion::{CompletionRequest, CompletionResult, TokenUsage};
pub use consulta::{
    ConsultaResult, CostEstimate, Evaluation, ModelChoice, Query, SignalSet, DEFAULT_SESSION_ID,
    DEFAULT_USER_TYPE,
};
