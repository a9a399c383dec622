//! Uniform success/failure envelopes for every route.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::app::Page;
use crate::domain::{
    AppError, ErrorEnvelope, PageRequest, TransactionPage, TransactionRecord, UpstreamError,
};

/// Shape a paginated result. `page`/`limit` echo the validated request even
/// when the page lies past the end of the result.
#[must_use]
pub fn success(
    page: Page<TransactionRecord>,
    request: PageRequest,
    search_query: Option<String>,
) -> TransactionPage {
    TransactionPage {
        data: page.items,
        total: page.total,
        page: request.page,
        limit: request.limit,
        total_pages: page.total_pages,
        success: true,
        search_query,
    }
}

/// Route-boundary error: any [`AppError`] rendered as an [`ErrorEnvelope`]
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    /// Reported as `limit` in the envelope
    pub default_limit: u32,
}

impl ApiError {
    #[must_use]
    pub fn new(error: AppError, default_limit: u32) -> Self {
        Self {
            error,
            default_limit,
        }
    }

    /// Status code and client-visible `error` value
    fn status_and_body(&self) -> (StatusCode, serde_json::Value) {
        let message = |m: &str| serde_json::Value::String(m.to_string());

        match &self.error {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, message(e.to_string().as_str())),
            AppError::Upstream(UpstreamError::Api {
                status_code,
                payload,
            }) => {
                let status = StatusCode::from_u16(*status_code)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, payload.clone())
            }
            AppError::Upstream(UpstreamError::Network(m)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message(m.as_str()))
            }
            AppError::Upstream(UpstreamError::InvalidResponse(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message("Invalid response from transaction service"),
            ),
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message("Server configuration error"),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message("Internal server error"),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        if status.is_server_error() {
            error!(status = %status, error = %self.error, "Request failed");
        } else {
            warn!(status = %status, error = %self.error, "Request rejected");
        }

        (status, Json(ErrorEnvelope::new(body, self.default_limit))).into_response()
    }
}
