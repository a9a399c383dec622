//! Page and search parameter policy.
//!
//! The two routes deliberately validate differently: the list route coerces
//! bad input to defaults and never fails, while the search route rejects any
//! out-of-policy field with a 400.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::error::{AppError, ValidationError};

/// Page sizes a client may ask for
pub const ALLOWED_LIMITS: [u32; 8] = [3, 5, 7, 10, 15, 20, 25, 50];

/// Page size used when none is configured
pub const DEFAULT_LIMIT: u32 = 5;

/// Maximum search query length, in characters
pub const MAX_QUERY_LENGTH: usize = 200;
const MAX_QUERY_LENGTH_U64: u64 = MAX_QUERY_LENGTH as u64;

#[must_use]
pub fn is_allowed_limit(limit: u32) -> bool {
    ALLOWED_LIMITS.contains(&limit)
}

/// Validated pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Page size, always a member of [`ALLOWED_LIMITS`]
    pub limit: u32,
}

/// Query string of `GET /api/transactions`
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (default 1)
    pub p: Option<String>,
    /// Page size; falls back to the default page size when not allowed
    pub limit: Option<String>,
}

impl ListQuery {
    /// Coerce to a page request. Never fails: anything unusable becomes the default.
    #[must_use]
    pub fn normalize(&self, default_limit: u32) -> PageRequest {
        let page = self
            .p
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| is_allowed_limit(*l))
            .unwrap_or(default_limit);

        PageRequest { page, limit }
    }
}

/// JSON body of `POST /api/transactions/search`, as received.
///
/// Fields stay untyped so a wrong JSON type surfaces as a field-level
/// validation error instead of an opaque body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SearchBody {
    /// Free-text query over sender, receiver, id or cause
    #[serde(default)]
    #[schema(value_type = String, example = "alice")]
    pub query: Option<serde_json::Value>,
    /// Page number (default 1)
    #[serde(default)]
    #[schema(value_type = Option<u32>, example = 1)]
    pub p: Option<serde_json::Value>,
    /// Page size, must be one of the allowed sizes
    #[serde(default)]
    #[schema(value_type = Option<u32>, example = 10)]
    pub limit: Option<serde_json::Value>,
}

/// Validated search request
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SearchRequest {
    /// Trimmed query text
    #[validate(length(max = MAX_QUERY_LENGTH_U64, message = "must be at most 200 characters"))]
    pub query: String,
    #[validate(range(min = 1, message = "p must be a positive integer"))]
    pub page: u32,
    pub limit: u32,
}

impl SearchRequest {
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            limit: self.limit,
        }
    }
}

impl SearchBody {
    /// Strictly validate the body. Absent `p`/`limit` take their defaults;
    /// present but out-of-policy values are rejected.
    pub fn into_request(self, default_limit: u32) -> Result<SearchRequest, AppError> {
        let query = match self.query {
            None => return Err(ValidationError::MissingField("query".to_string()).into()),
            Some(serde_json::Value::String(q)) => q.trim().to_string(),
            Some(_) => return Err(AppError::invalid_field("query", "query must be a string")),
        };
        if query.is_empty() {
            return Err(ValidationError::MissingField("query".to_string()).into());
        }

        let page = match self.p {
            None => 1,
            Some(value) => as_u32(&value)
                .ok_or_else(|| AppError::invalid_field("p", "p must be a positive integer"))?,
        };

        let limit = match self.limit {
            None => default_limit,
            Some(value) => as_u32(&value)
                .filter(|l| is_allowed_limit(*l))
                .ok_or_else(|| {
                    AppError::invalid_field(
                        "limit",
                        format!("limit must be one of {}", allowed_limits_list()),
                    )
                })?,
        };

        let request = SearchRequest { query, page, limit };
        request
            .validate()
            .map_err(|e| AppError::Validation(ValidationError::Multiple(e.to_string())))?;
        Ok(request)
    }
}

fn as_u32(value: &serde_json::Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn allowed_limits_list() -> String {
    ALLOWED_LIMITS
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(p: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            p: p.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    fn search(body: serde_json::Value) -> Result<SearchRequest, AppError> {
        serde_json::from_value::<SearchBody>(body)
            .unwrap()
            .into_request(DEFAULT_LIMIT)
    }

    #[test]
    fn test_default_limit_is_allowed() {
        assert!(is_allowed_limit(DEFAULT_LIMIT));
        assert_eq!(MAX_QUERY_LENGTH, 200);
    }

    #[test]
    fn test_list_defaults_when_absent() {
        assert_eq!(
            list(None, None).normalize(5),
            PageRequest { page: 1, limit: 5 }
        );
    }

    #[test]
    fn test_list_coerces_bad_input() {
        assert_eq!(list(Some("0"), None).normalize(5).page, 1);
        assert_eq!(list(Some("-3"), None).normalize(5).page, 1);
        assert_eq!(list(Some("abc"), None).normalize(5).page, 1);
        assert_eq!(list(Some("4"), None).normalize(5).page, 4);

        for bad in ["4", "0", "100", "ten", ""] {
            assert_eq!(list(None, Some(bad)).normalize(10).limit, 10, "limit={bad}");
        }
        for good in ALLOWED_LIMITS {
            let raw = good.to_string();
            assert_eq!(list(None, Some(&raw)).normalize(5).limit, good);
        }
    }

    #[test]
    fn test_search_requires_query() {
        for body in [json!({}), json!({"query": ""}), json!({"query": "   "}), json!({"query": null})] {
            let err = search(body.clone()).unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ValidationError::MissingField(ref f)) if f == "query"),
                "body={body}"
            );
        }
    }

    #[test]
    fn test_search_rejects_non_string_query() {
        assert!(matches!(
            search(json!({"query": 42})),
            Err(AppError::Validation(ValidationError::InvalidField { .. }))
        ));
    }

    #[test]
    fn test_search_rejects_overlong_query() {
        let long = "x".repeat(MAX_QUERY_LENGTH + 1);
        let err = search(json!({ "query": long })).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::Multiple(_))
        ));
        let message = err.to_string();
        assert!(message.contains("must be at most 200 characters"));
        assert!(!message.contains("query: query"));

        let max = "x".repeat(MAX_QUERY_LENGTH);
        assert!(search(json!({ "query": max })).is_ok());
    }

    #[test]
    fn test_search_rejects_invalid_limit_instead_of_defaulting() {
        for limit in [json!(4), json!(0), json!(-5), json!("10"), json!(10.5)] {
            let err = search(json!({"query": "alice", "limit": limit})).unwrap_err();
            assert!(err.to_string().contains("limit"), "limit={limit}");
        }
    }

    #[test]
    fn test_search_rejects_invalid_page() {
        for p in [json!(0), json!(-1), json!("2"), json!(1.5)] {
            let err = search(json!({"query": "alice", "p": p})).unwrap_err();
            assert!(err.to_string().contains("p must be a positive integer"), "p={p}");
        }
    }

    #[test]
    fn test_search_applies_defaults_and_trims() {
        let req = search(json!({"query": "  alice "})).unwrap();
        assert_eq!(req.query, "alice");
        assert_eq!(req.page_request(), PageRequest { page: 1, limit: DEFAULT_LIMIT });

        let req = search(json!({"query": "bob", "p": 3, "limit": 25})).unwrap();
        assert_eq!(req.page_request(), PageRequest { page: 3, limit: 25 });
    }
}
