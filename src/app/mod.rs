//! Application layer containing configuration, business logic and shared state.

pub mod config;
pub mod pagination;
pub mod service;
pub mod state;

pub use config::{AppConfig, RateLimitConfig, UpstreamConfig};
pub use pagination::{Page, paginate};
pub use service::TransactionService;
pub use state::AppState;
