//! The API layer, containing web handlers and routing.

pub mod envelope;
pub mod handlers;
pub mod rate_limit;
pub mod router;

pub use envelope::ApiError;
pub use handlers::ApiDoc;
pub use rate_limit::{Admission, FixedWindowLimiter};
pub use router::{
    RateLimitConfig, create_router, create_router_with_limiter, create_router_with_rate_limit,
};
