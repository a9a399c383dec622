//! YaYa Wallet transaction API client.
//!
//! Every call is signed with [`RequestSigner`] against the upstream path and
//! returns the full, unpaginated `data` array. No retries happen here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, error, instrument, warn};

use crate::domain::{AppError, TransactionGateway, TransactionRecord, UpstreamError};

use super::signing::{RequestSigner, SigningContext, SigningMethod, canonical_body};

/// Upstream path listing the authenticated account's transactions
pub const FIND_BY_USER_PATH: &str = "/api/en/transaction/find-by-user";

/// Upstream free-text search path
pub const SEARCH_PATH: &str = "/api/en/transaction/search";

/// Default bound on a single upstream call
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Client-visible message for calls that got no response
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the transaction service";

/// Signed HTTP gateway to the wallet provider
#[derive(Debug, Clone)]
pub struct YayaTransactionGateway {
    http_client: Client,
    base_url: String,
    signer: RequestSigner,
}

impl YayaTransactionGateway {
    /// Create a gateway for `base_url` (scheme and host, no trailing path).
    pub fn new(base_url: &str, signer: RequestSigner, timeout: Duration) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
        })
    }

    pub fn with_default_timeout(base_url: &str, signer: RequestSigner) -> Result<Self, AppError> {
        Self::new(base_url, signer, DEFAULT_UPSTREAM_TIMEOUT)
    }

    async fn fetch(&self, ctx: SigningContext<'_>) -> Result<Vec<TransactionRecord>, AppError> {
        let url = format!("{}{}", self.base_url, ctx.endpoint_path);
        let headers = self.signer.sign(&ctx);

        let mut request = match ctx.method {
            SigningMethod::Get => self.http_client.get(&url),
            SigningMethod::Post => self.http_client.post(&url).body(canonical_body(ctx.body)),
        };
        for (name, value) in headers.pairs() {
            request = request.header(name, value);
        }

        debug!(
            method = ctx.method.as_str(),
            path = ctx.endpoint_path,
            timestamp = %headers.timestamp,
            "Calling transaction service"
        );

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                error!(error = %e, "Failed to build transaction service request");
                return AppError::Internal("Failed to build upstream request".to_string());
            }
            error!(error = %e, timeout = e.is_timeout(), "Transaction service unreachable");
            AppError::Upstream(UpstreamError::Network(NETWORK_ERROR_MESSAGE.to_string()))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read transaction service response");
            AppError::Upstream(UpstreamError::Network(NETWORK_ERROR_MESSAGE.to_string()))
        })?;

        if !status.is_success() {
            warn!(status = %status, "Transaction service returned error");
            return Err(AppError::Upstream(UpstreamError::Api {
                status_code: status.as_u16(),
                payload: error_payload(status, &body),
            }));
        }

        let records = parse_records(&body).map_err(|e| {
            error!(error = %e, "Failed to parse transaction service response");
            AppError::Upstream(e)
        })?;
        debug!(count = records.len(), "Transaction service call complete");
        Ok(records)
    }
}

#[async_trait]
impl TransactionGateway for YayaTransactionGateway {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<TransactionRecord>, AppError> {
        self.fetch(SigningContext::get(FIND_BY_USER_PATH)).await
    }

    #[instrument(skip(self))]
    async fn search_all(&self, query: &str) -> Result<Vec<TransactionRecord>, AppError> {
        let body = json!({ "query": query });
        self.fetch(SigningContext::post(SEARCH_PATH, &body)).await
    }
}

/// Extract the `data` array. A missing or null `data` is an empty result.
fn parse_records(body: &str) -> Result<Vec<TransactionRecord>, UpstreamError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

    let data = match value {
        serde_json::Value::Object(mut map) => map.remove("data"),
        _ => None,
    };

    match data {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => {
            Ok(items.into_iter().map(TransactionRecord::from).collect())
        }
        Some(_) => Err(UpstreamError::InvalidResponse(
            "data is not an array".to_string(),
        )),
    }
}

/// Upstream error body as JSON when possible, else as text.
fn error_payload(status: StatusCode, body: &str) -> serde_json::Value {
    if body.trim().is_empty() {
        return serde_json::Value::String(format!(
            "Request failed with status code {}",
            status.as_u16()
        ));
    }
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_keeps_order() {
        let records =
            parse_records(r#"{"data":[{"id":"b"},{"id":"a"},{"id":"c"}],"lastPage":1}"#).unwrap();
        let ids: Vec<_> = records.iter().filter_map(TransactionRecord::id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_records_missing_data_is_empty() {
        assert!(parse_records(r#"{"total":0}"#).unwrap().is_empty());
        assert!(parse_records(r#"{"data":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_records_rejects_garbage() {
        assert!(matches!(
            parse_records("<!DOCTYPE html><html></html>"),
            Err(UpstreamError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_records(r#"{"data":{"id":"x"}}"#),
            Err(UpstreamError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_error_payload_passthrough() {
        assert_eq!(
            error_payload(StatusCode::UNAUTHORIZED, r#"{"message":"bad sign"}"#),
            json!({"message": "bad sign"})
        );
        assert_eq!(
            error_payload(StatusCode::BAD_GATEWAY, "upstream down"),
            json!("upstream down")
        );
        assert_eq!(
            error_payload(StatusCode::NOT_FOUND, ""),
            json!("Request failed with status code 404")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let signer = RequestSigner::new("k", secrecy::SecretString::from("s"));
        let gateway =
            YayaTransactionGateway::with_default_timeout("https://wallet.example/", signer)
                .unwrap();
        assert_eq!(gateway.base_url, "https://wallet.example");
    }
}
