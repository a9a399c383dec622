//! Router assembly: routes, CORS, request tracing and the ingress guard.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use crate::app::RateLimitConfig;
use crate::app::AppState;

use super::handlers::{
    ApiDoc, health_check_handler, list_transactions_handler, search_transactions_handler,
};
use super::rate_limit::{FixedWindowLimiter, ingress_guard};

/// Largest accepted search body
pub const MAX_SEARCH_BODY_BYTES: usize = 16 * 1024;

/// Build the router without an ingress guard
pub fn create_router(state: Arc<AppState>) -> Router {
    build_router(state, None)
}

/// Build the router with a fresh shared request budget
pub fn create_router_with_rate_limit(state: Arc<AppState>, config: RateLimitConfig) -> Router {
    create_router_with_limiter(state, Arc::new(FixedWindowLimiter::new(config)))
}

/// Build the router around an existing limiter
pub fn create_router_with_limiter(
    state: Arc<AppState>,
    limiter: Arc<FixedWindowLimiter>,
) -> Router {
    build_router(state, Some(limiter))
}

fn build_router(state: Arc<AppState>, limiter: Option<Arc<FixedWindowLimiter>>) -> Router {
    let cors = cors_layer(&state.cors_origins);

    let router = Router::new()
        .route("/api/transactions", get(list_transactions_handler))
        .route(
            "/api/transactions/search",
            post(search_transactions_handler).layer(DefaultBodyLimit::max(MAX_SEARCH_BODY_BYTES)),
        )
        .route("/health", get(health_check_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Guard sits inside CORS so rejections still carry CORS headers.
    let router = match limiter {
        Some(limiter) => router.layer(middleware::from_fn_with_state(limiter, ingress_guard)),
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

/// CORS for the configured dashboard origins, with credentials.
/// `AppConfig` rejects wildcard and malformed origins before they get here.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}
