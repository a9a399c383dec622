//! Response shapes and pass-through upstream records.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed rejection message of the ingress guard
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, try again later.";

/// A transaction as returned by the wallet provider.
///
/// The upstream owns this schema (id, sender, receiver, amount, currency,
/// cause, created_at and optional account names); the proxy forwards it
/// untouched, preserving field order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TransactionRecord(serde_json::Value);

impl TransactionRecord {
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Upstream identifier, when the record carries a string `id`
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(serde_json::Value::as_str)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for TransactionRecord {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// One page of transactions (success envelope)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// Records on this page, in upstream order
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<TransactionRecord>,
    /// Number of records in the full upstream result
    #[schema(example = 12)]
    pub total: usize,
    /// Requested page (1-based), echoed even when past the last page
    #[schema(example = 2)]
    pub page: u32,
    /// Effective page size
    #[schema(example = 5)]
    pub limit: u32,
    /// `ceil(total / limit)`
    #[schema(example = 3)]
    pub total_pages: usize,
    pub success: bool,
    /// Query that produced this page (search only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "alice")]
    pub search_query: Option<String>,
}

/// Failure envelope. Same field set as [`TransactionPage`] so the dashboard
/// can render either without branching on the error kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Message, or the upstream error payload passed through verbatim
    #[schema(value_type = Object)]
    pub error: serde_json::Value,
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<TransactionRecord>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(error: serde_json::Value, default_limit: u32) -> Self {
        Self {
            error,
            success: false,
            data: Vec::new(),
            total: 0,
            page: 1,
            limit: default_limit,
            total_pages: 0,
        }
    }
}

/// Ingress guard rejection body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RateLimitResponse {
    #[schema(example = "Too many requests, try again later.")]
    pub error: String,
}

impl Default for RateLimitResponse {
    fn default() -> Self {
        Self {
            error: RATE_LIMIT_MESSAGE.to_string(),
        }
    }
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    /// ISO-8601 server time
    #[schema(example = "2024-01-01T00:00:00.000Z")]
    pub timestamp: String,
}

impl HealthResponse {
    #[must_use]
    pub fn now() -> Self {
        Self {
            ok: true,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_serializes_camel_case_and_omits_absent_query() {
        let page = TransactionPage {
            data: vec![TransactionRecord::new(json!({"id": "tx1"}))],
            total: 1,
            page: 1,
            limit: 5,
            total_pages: 1,
            success: true,
            search_query: None,
        };

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["data"][0]["id"], "tx1");
        assert!(value.get("searchQuery").is_none());
        assert!(value.get("total_pages").is_none());
    }

    #[test]
    fn test_error_envelope_defaults() {
        let envelope = ErrorEnvelope::new(json!("boom"), 7);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "error": "boom",
                "success": false,
                "data": [],
                "total": 0,
                "page": 1,
                "limit": 7,
                "totalPages": 0
            })
        );
    }

    #[test]
    fn test_record_passes_fields_through_in_order() {
        let raw = r#"{"id":"tx1","sender":"a","receiver":"b","amount":10,"currency":"ETB","cause":"rent","created_at":"1700000000"}"#;
        let record: TransactionRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id(), Some("tx1"));
        assert_eq!(serde_json::to_string(&record).unwrap(), raw);
    }

    #[test]
    fn test_health_timestamp_is_iso8601() {
        let health = HealthResponse::now();
        assert!(health.ok);
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
        assert!(health.timestamp.ends_with('Z'));
    }
}
