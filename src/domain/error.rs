//! Error taxonomy for the proxy.

use thiserror::Error;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Client input that violates the page/search policy
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Multiple(String),
}

/// Failures talking to the wallet transaction service
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UpstreamError {
    /// The service answered with a non-2xx status. `payload` is passed through verbatim.
    #[error("Transaction service returned {status_code}")]
    Api {
        status_code: u16,
        payload: serde_json::Value,
    },

    /// No response was received (connect failure, timeout, reset).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from transaction service: {0}")]
    InvalidResponse(String),
}

/// Startup configuration problems. Fatal: the process must not serve traffic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl AppError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::InvalidField {
            field: field.into(),
            message: message.into(),
        })
    }
}
