//! Legal LLM observability demo
//!
//! Answers legal questions through a chat-completion API, has a second model
//! grade the answer, extracts sentiment and toxicity signals, estimates the
//! cost and records everything as an observability annotation.

pub mod config;
pub mod demo;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod services;
pub mod sink;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, router_with_state, AppState};
pub use models::{ConsultaResult, Query};
pub use providers::{CompletionProvider, OpenAIProvider};
pub use services::ConsultaPipeline;
pub use sink::ObservabilitySink;
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
