//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// OpenAI API configuration
    pub openai: OpenAIConfig,
    /// Models used by each pipeline stage
    pub models: ModelSettings,
    /// Token prices used by the cost estimate
    pub pricing: PricingConfig,
    /// Observability sink configuration
    pub llmobs: ObservabilityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Maximum request body size in bytes
    pub max_request_size: usize,
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

/// Model identifiers per stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model answering ordinary questions
    pub primary: String,
    /// Weaker model answering the trigger question
    pub fallback: String,
    /// Model scoring answers
    pub evaluator: String,
    /// Model extracting sentiment and toxicity
    pub signals: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            primary: "gpt-4".to_string(),
            fallback: "gpt-3.5-turbo".to_string(),
            evaluator: "gpt-4".to_string(),
            signals: "gpt-4".to_string(),
        }
    }
}

/// Per-token prices in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub input_per_token: f64,
    pub output_per_token: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        // GPT-4, May 2025: $10 / 1M input, $30 / 1M output
        Self {
            input_per_token: 0.00001,
            output_per_token: 0.00003,
        }
    }
}

/// Which sink receives annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Tracing,
    Http,
    None,
}

impl std::str::FromStr for SinkKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tracing" => Ok(SinkKind::Tracing),
            "http" => Ok(SinkKind::Http),
            "none" | "noop" => Ok(SinkKind::None),
            other => anyhow::bail!("Unknown observability sink: {}", other),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Sink implementation
    pub sink: SinkKind,
    /// Environment tag attached to every annotation
    pub environment: String,
    /// Prompt version label
    pub prompt_name: String,
    /// Collector base URL, required by the http sink
    pub collector_url: Option<String>,
    /// Collector API key (optional)
    pub collector_api_key: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::Tracing,
            environment: "demo".to_string(),
            prompt_name: "consulta_legal_v1".to_string(),
            collector_url: None,
            collector_api_key: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let defaults = PricingConfig::default();

        let settings = Self {
            server: ServerConfig {
                host: get_env_or_default("SERVER_HOST", "0.0.0.0"),
                port: get_env_or_default("SERVER_PORT", "8082")
                    .parse()
                    .context("Invalid port number")?,
                max_request_size: get_env_or_default("MAX_REQUEST_SIZE", "1048576")
                    .parse()
                    .context("Invalid maximum request size")?,
            },
            openai: OpenAIConfig {
                api_key: std::env::var("OPENAI_API_KEY")
                    .context("OPENAI_API_KEY environment variable not set")?,
                base_url: get_env_or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                timeout: get_env_or_default("REQUEST_TIMEOUT", "60")
                    .parse()
                    .context("Invalid timeout value")?,
            },
            models: ModelSettings {
                primary: get_env_or_default("PRIMARY_MODEL", "gpt-4"),
                fallback: get_env_or_default("FALLBACK_MODEL", "gpt-3.5-turbo"),
                evaluator: get_env_or_default("EVALUATOR_MODEL", "gpt-4"),
                signals: get_env_or_default("SIGNAL_MODEL", "gpt-4"),
            },
            pricing: PricingConfig {
                input_per_token: get_env_or_default(
                    "PRICE_PER_INPUT_TOKEN",
                    &defaults.input_per_token.to_string(),
                )
                .parse()
                .context("Invalid input token price")?,
                output_per_token: get_env_or_default(
                    "PRICE_PER_OUTPUT_TOKEN",
                    &defaults.output_per_token.to_string(),
                )
                .parse()
                .context("Invalid output token price")?,
            },
            llmobs: ObservabilityConfig {
                sink: get_env_or_default("LLMOBS_SINK", "tracing").parse()?,
                environment: get_env_or_default("LLMOBS_ENV", "demo"),
                prompt_name: get_env_or_default("LLMOBS_PROMPT_NAME", "consulta_legal_v1"),
                collector_url: get_env_opt("LLMOBS_COLLECTOR_URL"),
                collector_api_key: get_env_opt("LLMOBS_API_KEY"),
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if self.server.max_request_size == 0 {
            anyhow::bail!("Maximum request size cannot be 0");
        }

        if self.openai.api_key.is_empty() {
            anyhow::bail!("OpenAI API key cannot be empty");
        }

        if self.openai.api_key.contains(char::is_whitespace) {
            anyhow::bail!("OpenAI API key cannot contain whitespace characters");
        }

        if !self.openai.base_url.starts_with("http") {
            anyhow::bail!("Invalid OpenAI base URL format, should start with 'http'");
        }

        if self.openai.timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        for (name, price) in [
            ("input", self.pricing.input_per_token),
            ("output", self.pricing.output_per_token),
        ] {
            if !price.is_finite() || price < 0.0 {
                anyhow::bail!("Invalid {} token price: {}", name, price);
            }
        }

        if self.llmobs.sink == SinkKind::Http {
            match self.llmobs.collector_url.as_deref() {
                Some(url) if url.starts_with("http") => {}
                Some(url) => anyhow::bail!("Invalid collector URL: {}", url),
                None => anyhow::bail!("LLMOBS_COLLECTOR_URL is required for the http sink"),
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }

    /// Listen address for the HTTP surface
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable, treating empty values as unset
fn get_env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
