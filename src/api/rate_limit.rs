//! Ingress guard: one fixed-window request budget shared by all callers.
//!
//! Requests over budget are answered with 429 before any validation,
//! signing or upstream call happens.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::app::RateLimitConfig;
use crate::domain::RateLimitResponse;

pub const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted {
        remaining: u32,
        reset_after: Duration,
    },
    Rejected {
        reset_after: Duration,
    },
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Process-wide fixed-window counter
#[derive(Debug)]
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    window: Mutex<Window>,
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    #[must_use]
    pub fn starting_at(config: RateLimitConfig, started: Instant) -> Self {
        Self {
            config,
            window: Mutex::new(Window { started, count: 0 }),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    pub fn check(&self) -> Admission {
        self.check_at(Instant::now())
    }

    /// Count one request arriving at `now`.
    ///
    /// Windows are aligned to the limiter's start, so the counter resets every
    /// `window` regardless of when traffic arrives.
    pub fn check_at(&self, now: Instant) -> Admission {
        let period = self.config.window;
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= period {
            let into_current = elapsed.as_nanos() % period.as_nanos();
            let into_current = u64::try_from(into_current).unwrap_or(u64::MAX);
            window.started = now - Duration::from_nanos(into_current);
            window.count = 0;
        }
        let reset_after = period.saturating_sub(now.saturating_duration_since(window.started));

        if window.count < self.config.max_requests {
            window.count += 1;
            Admission::Admitted {
                remaining: self.config.max_requests - window.count,
                reset_after,
            }
        } else {
            Admission::Rejected { reset_after }
        }
    }
}

/// axum middleware applying a shared [`FixedWindowLimiter`]
pub async fn ingress_guard(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let limit = limiter.config().max_requests;

    match limiter.check() {
        Admission::Admitted {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(request).await;
            insert_headers(response.headers_mut(), limit, remaining, reset_after);
            response
        }
        Admission::Rejected { reset_after } => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rate limit exceeded"
            );
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitResponse::default()),
            )
                .into_response();
            let headers = response.headers_mut();
            insert_headers(headers, limit, 0, reset_after);
            headers.insert(RETRY_AFTER, HeaderValue::from(ceil_secs(reset_after)));
            response
        }
    }
}

fn insert_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_after: Duration) {
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(remaining));
    headers.insert(RATE_LIMIT_RESET, HeaderValue::from(ceil_secs(reset_after)));
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}
