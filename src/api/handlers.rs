//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use tracing::debug;
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::{
    AppError, ErrorEnvelope, HealthResponse, ListQuery, RateLimitResponse, SearchBody,
    TransactionPage, ValidationError,
};

use super::envelope::{ApiError, success};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Dashboard Proxy API",
        version = "0.1.0",
        description = "Paginated, signed access to YaYa Wallet transactions",
        license(
            name = "MIT"
        )
    ),
    paths(
        list_transactions_handler,
        search_transactions_handler,
        health_check_handler,
    ),
    components(
        schemas(
            TransactionPage,
            ErrorEnvelope,
            SearchBody,
            HealthResponse,
            RateLimitResponse,
        )
    ),
    tags(
        (name = "transactions", description = "Transaction listing and search"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// List the account's transactions, one page at a time
///
/// Out-of-policy `p` or `limit` values fall back to defaults instead of failing.
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "transactions",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of transactions", body = TransactionPage),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Transaction service unreachable", body = ErrorEnvelope)
    )
)]
pub async fn list_transactions_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<TransactionPage>, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_else(|rejection| {
        debug!(error = %rejection, "Unparseable list query, using defaults");
        ListQuery::default()
    });
    let request = query.normalize(state.default_limit);

    let page = state
        .service
        .list_transactions(request)
        .await
        .map_err(|e| ApiError::new(e, state.default_limit))?;
    Ok(Json(success(page, request, None)))
}

/// Search transactions by sender, receiver, id or cause
///
/// Unlike the list route, every field is validated strictly.
#[utoipa::path(
    post,
    path = "/api/transactions/search",
    tag = "transactions",
    request_body = SearchBody,
    responses(
        (status = 200, description = "One page of matching transactions", body = TransactionPage),
        (status = 400, description = "Missing query or out-of-policy p/limit", body = ErrorEnvelope),
        (status = 429, description = "Rate limit exceeded", body = RateLimitResponse),
        (status = 500, description = "Transaction service unreachable", body = ErrorEnvelope)
    )
)]
pub async fn search_transactions_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<TransactionPage>, ApiError> {
    let fail = |e: AppError| ApiError::new(e, state.default_limit);

    let Json(body) =
        body.map_err(|rejection| fail(ValidationError::InvalidBody(rejection.body_text()).into()))?;
    let request = body.into_request(state.default_limit).map_err(fail)?;

    let page = state
        .service
        .search_transactions(&request)
        .await
        .map_err(fail)?;
    Ok(Json(success(
        page,
        request.page_request(),
        Some(request.query),
    )))
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse::now())
}
