//! Configuration management module
//!
//! Loads settings from environment variables and an optional `.env` file

pub mod settings;

pub use settings::{
    LoggingConfig, ModelSettings, ObservabilityConfig, OpenAIConfig, PricingConfig, ServerConfig,
    Settings, SinkKind,
};
