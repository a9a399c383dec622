//! Application state management.

use std::sync::Arc;

use crate::domain::{DEFAULT_LIMIT, TransactionGateway};

use super::config::{AppConfig, DEFAULT_CLIENT_URL};
use super::service::TransactionService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransactionService>,
    /// Page size substituted for missing or disallowed list limits
    pub default_limit: u32,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Create a new application state with default page policy
    #[must_use]
    pub fn new(gateway: Arc<dyn TransactionGateway>) -> Self {
        Self {
            service: Arc::new(TransactionService::new(gateway)),
            default_limit: DEFAULT_LIMIT,
            cors_origins: vec![DEFAULT_CLIENT_URL.to_string()],
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig, gateway: Arc<dyn TransactionGateway>) -> Self {
        Self::new(gateway)
            .with_default_limit(config.default_limit)
            .with_cors_origins(config.cors_origins.clone())
    }

    /// Override the default page size (builder pattern)
    #[must_use]
    pub fn with_default_limit(mut self, default_limit: u32) -> Self {
        self.default_limit = default_limit;
        self
    }

    #[must_use]
    pub fn with_cors_origins(mut self, cors_origins: Vec<String>) -> Self {
        self.cors_origins = cors_origins;
        self
    }
}
