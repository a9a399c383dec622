//! HMAC-SHA256 request signing for the wallet transaction API.
//!
//! Pre-hash layout: `{timestamp_ms}{METHOD}{endpoint_path}{body}` with no
//! delimiters. `body` is the compact JSON actually sent, or empty when the
//! request carries no fields. The digest is base64 (standard alphabet).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const API_KEY_HEADER: &str = "YAYA-API-KEY";
pub const TIMESTAMP_HEADER: &str = "YAYA-API-TIMESTAMP";
pub const SIGNATURE_HEADER: &str = "YAYA-API-SIGN";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP methods the upstream is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningMethod {
    Get,
    Post,
}

impl SigningMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// What gets signed for one outbound call
#[derive(Debug, Clone, Copy)]
pub struct SigningContext<'a> {
    pub method: SigningMethod,
    /// Upstream path, not the dashboard-facing route
    pub endpoint_path: &'a str,
    pub body: Option<&'a serde_json::Value>,
}

impl<'a> SigningContext<'a> {
    #[must_use]
    pub fn get(endpoint_path: &'a str) -> Self {
        Self {
            method: SigningMethod::Get,
            endpoint_path,
            body: None,
        }
    }

    #[must_use]
    pub fn post(endpoint_path: &'a str, body: &'a serde_json::Value) -> Self {
        Self {
            method: SigningMethod::Post,
            endpoint_path,
            body: Some(body),
        }
    }
}

/// Authentication headers for one outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    pub api_key: String,
    /// Milliseconds since the Unix epoch, decimal
    pub timestamp: String,
    /// Base64 HMAC-SHA256 digest
    pub signature: String,
    pub content_type: &'static str,
}

impl SignatureHeaders {
    /// Header name/value pairs in the order the upstream documents them
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (API_KEY_HEADER, self.api_key.as_str()),
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
            ("Content-Type", self.content_type),
        ]
    }
}

/// Serialized body as it is both signed and sent.
///
/// Absent bodies, `null` and objects without fields sign as the empty string.
#[must_use]
pub fn canonical_body(body: Option<&serde_json::Value>) -> String {
    match body {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::Object(map)) if map.is_empty() => String::new(),
        Some(value) => value.to_string(),
    }
}

/// Compute the signature headers for a fixed timestamp. Pure and deterministic.
#[must_use]
pub fn sign_with_timestamp(
    secret: &SecretString,
    api_key: &str,
    ctx: &SigningContext<'_>,
    timestamp_ms: i64,
) -> SignatureHeaders {
    let timestamp = timestamp_ms.to_string();
    let prehash = format!(
        "{}{}{}{}",
        timestamp,
        ctx.method.as_str(),
        ctx.endpoint_path,
        canonical_body(ctx.body)
    );

    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(prehash.as_bytes());
    let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());

    SignatureHeaders {
        api_key: api_key.to_string(),
        timestamp,
        signature,
        content_type: CONTENT_TYPE_JSON,
    }
}

/// Holds the API credentials and stamps each call with the current time.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    api_key: String,
    secret: SecretString,
}

impl RequestSigner {
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret: SecretString) -> Self {
        Self {
            api_key: api_key.into(),
            secret,
        }
    }

    /// Sign at the current wall-clock time
    #[must_use]
    pub fn sign(&self, ctx: &SigningContext<'_>) -> SignatureHeaders {
        self.sign_at(ctx, Utc::now().timestamp_millis())
    }

    #[must_use]
    pub fn sign_at(&self, ctx: &SigningContext<'_>, timestamp_ms: i64) -> SignatureHeaders {
        sign_with_timestamp(&self.secret, &self.api_key, ctx, timestamp_ms)
    }
}
