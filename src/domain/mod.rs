//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod params;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, UpstreamError, ValidationError};
pub use params::{
    ALLOWED_LIMITS, DEFAULT_LIMIT, ListQuery, MAX_QUERY_LENGTH, PageRequest, SearchBody,
    SearchRequest, is_allowed_limit,
};
pub use traits::TransactionGateway;
pub use types::{
    ErrorEnvelope, HealthResponse, RATE_LIMIT_MESSAGE, RateLimitResponse, TransactionPage,
    TransactionRecord,
};
