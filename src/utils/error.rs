//! Error handling module
//!
//! Defines error types shared by the pipeline, the provider client and the HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Model output did not match the schema expected at a call site
    #[error("Model output parse error: {0}")]
    Parse(#[from] ParseError),

    /// Request validation failed
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// Upstream provider rejected our credentials
    #[error("Upstream authentication failed: {0}")]
    Authentication(String),

    /// External API error
    #[error("External API error: {0}")]
    ExternalApi(String),

    /// Provider answered without any choice to read
    #[error("Completion from model {model} contained no choices")]
    EmptyCompletion { model: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, please try again later")]
    RateLimit,

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// The five places where model output is parsed as JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallSite {
    Evaluation,
    InputSentiment,
    OutputSentiment,
    InputToxicity,
    OutputToxicity,
}

impl CallSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallSite::Evaluation => "evaluation",
            CallSite::InputSentiment => "input_sentiment",
            CallSite::OutputSentiment => "output_sentiment",
            CallSite::InputToxicity => "input_toxicity",
            CallSite::OutputToxicity => "output_toxicity",
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong while reading a model's JSON answer
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Body is not a JSON object
    InvalidJson(String),
    /// Required key is absent
    MissingKey(&'static str),
    /// Key is present with the wrong JSON type
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
}

/// Parse failure tagged with the call site that produced it
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{site}: {kind}")]
pub struct ParseError {
    pub site: CallSite,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidJson(reason) => write!(f, "invalid JSON ({})", reason),
            ParseErrorKind::MissingKey(key) => write!(f, "missing key '{}'", key),
            ParseErrorKind::WrongType { key, expected } => {
                write!(f, "key '{}' is not a {}", key, expected)
            }
        }
    }
}

impl ParseError {
    pub fn invalid_json(site: CallSite, reason: impl Into<String>) -> Self {
        Self {
            site,
            kind: ParseErrorKind::InvalidJson(reason.into()),
        }
    }

    pub fn missing_key(site: CallSite, key: &'static str) -> Self {
        Self {
            site,
            kind: ParseErrorKind::MissingKey(key),
        }
    }

    pub fn wrong_type(site: CallSite, key: &'static str, expected: &'static str) -> Self {
        Self {
            site,
            kind: ParseErrorKind::WrongType { key, expected },
        }
    }
}

/// Error response body for the HTTP surface
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub response_type: String,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    /// Parse site, only for parse errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_site: Option<CallSite>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Parse(_)
            | AppError::ExternalApi(_)
            | AppError::Authentication(_)
            | AppError::EmptyCompletion { .. } => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::HttpClient(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "invalid_request_error",
            AppError::RateLimit => "rate_limit_error",
            AppError::Timeout => "timeout_error",
            AppError::Parse(_) => "model_output_error",
            AppError::Authentication(_) => "upstream_authentication_error",
            AppError::ExternalApi(_) | AppError::EmptyCompletion { .. } => "upstream_error",
            AppError::Config(_)
            | AppError::HttpClient(_)
            | AppError::Internal(_) => "api_error",
        }
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, AppError::Validation(_))
    }

    /// Convert to the HTTP error body
    pub fn to_error_response(&self) -> ErrorResponse {
        let call_site = match self {
            AppError::Parse(err) => Some(err.site),
            _ => None,
        };

        ErrorResponse {
            response_type: "error".to_string(),
            error: ErrorBody {
                error_type: self.error_type().to_string(),
                message: self.to_string(),
                call_site,
            },
        }
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.should_log_details() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else {
            tracing::warn!("Client error: {} - Status code: {}", self.error_type(), status);
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation("test".to_string()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::RateLimit.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            AppError::Parse(ParseError::missing_key(CallSite::Evaluation, "comentario")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(AppError::Internal("test".to_string()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::missing_key(CallSite::InputToxicity, "toxico");
        assert_eq!(err.to_string(), "input_toxicity: missing key 'toxico'");

        let err = ParseError::wrong_type(CallSite::Evaluation, "hallucination", "boolean");
        assert_eq!(err.to_string(), "evaluation: key 'hallucination' is not a boolean");
    }

    #[test]
    fn test_error_response_carries_call_site() {
        let app_error = AppError::from(ParseError::invalid_json(CallSite::OutputSentiment, "EOF"));
        let body = app_error.to_error_response();

        assert_eq!(body.response_type, "error");
        assert_eq!(body.error.error_type, "model_output_error");
        assert_eq!(body.error.call_site, Some(CallSite::OutputSentiment));
    }
}
