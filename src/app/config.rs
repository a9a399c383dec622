//! Environment-driven configuration, assembled once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::domain::{ConfigError, DEFAULT_LIMIT, is_allowed_limit};
use crate::infra::RequestSigner;

/// Default dashboard origin allowed by CORS
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";

/// Credentials and location of the wallet transaction API
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: SecretString,
    pub timeout: Duration,
}

impl UpstreamConfig {
    #[must_use]
    pub fn signer(&self) -> RequestSigner {
        RequestSigner::new(self.api_key.clone(), self.api_secret.clone())
    }
}

/// Ingress guard budget: at most `max_requests` per `window`, shared by all callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_requests = parse_or(lookup, "RATE_LIMIT_MAX_REQUESTS", defaults.max_requests)?;
        let window_secs = parse_or(lookup, "RATE_LIMIT_WINDOW_SECS", defaults.window.as_secs())?;

        if max_requests == 0 {
            return Err(invalid("RATE_LIMIT_MAX_REQUESTS", "must be greater than 0"));
        }
        if window_secs == 0 {
            return Err(invalid("RATE_LIMIT_WINDOW_SECS", "must be greater than 0"));
        }

        Ok(Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        })
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamConfig,
    /// Page size used when a list request gives none or a disallowed one
    pub default_limit: u32,
    /// Origins allowed to call the API with credentials
    pub cors_origins: Vec<String>,
    pub enable_rate_limiting: bool,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Read the process environment. Missing credentials are fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = required(&lookup, "YAYA_API_KEY")?;
        let api_secret = SecretString::from(required(&lookup, "YAYA_API_SECRET")?);
        let base_url = required(&lookup, "YAYA_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let timeout_secs: u64 = parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(invalid("UPSTREAM_TIMEOUT_SECS", "must be greater than 0"));
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 5000)?;

        let default_limit = parse_or(&lookup, "DEFAULT_LIMIT", DEFAULT_LIMIT)?;
        if !is_allowed_limit(default_limit) {
            return Err(invalid(
                "DEFAULT_LIMIT",
                format!("{} is not an allowed page size", default_limit),
            ));
        }

        let cors_origins = parse_origins(
            &lookup("CLIENT_URL").unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string()),
        )?;

        let enable_rate_limiting = lookup("ENABLE_RATE_LIMITING")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);
        let rate_limit = RateLimitConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            upstream: UpstreamConfig {
                base_url,
                api_key,
                api_secret,
                timeout: Duration::from_secs(timeout_secs),
            },
            default_limit,
            cors_origins,
            enable_rate_limiting,
            rate_limit,
        })
    }
}

/// Comma-separated dashboard origins. Credentialed CORS rules out `*`.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Err(invalid(
                    "CLIENT_URL",
                    "wildcard origin cannot be used with credentials",
                ));
            }
            HeaderValue::from_str(origin)
                .map(|_| origin.to_string())
                .map_err(|_| invalid("CLIENT_URL", format!("{:?} is not a valid origin", origin)))
        })
        .collect()
}

fn required<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(name, format!("cannot parse {:?}", raw))),
    }
}

fn invalid(name: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const CREDS: [(&str, &str); 3] = [
        ("YAYA_API_KEY", "key"),
        ("YAYA_API_SECRET", "secret"),
        ("YAYA_BASE_URL", "https://wallet.example/"),
    ];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(vars(&CREDS)).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.cors_origins, vec![DEFAULT_CLIENT_URL.to_string()]);
        assert!(config.enable_rate_limiting);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert_eq!(config.upstream.base_url, "https://wallet.example");
        assert_eq!(config.upstream.timeout, Duration::from_secs(10));
        assert_eq!(config.upstream.api_secret.expose_secret(), "secret");
    }

    #[test]
    fn test_missing_credentials_are_fatal() {
        for missing in ["YAYA_API_KEY", "YAYA_API_SECRET", "YAYA_BASE_URL"] {
            let pairs: Vec<_> = CREDS.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = AppConfig::from_lookup(vars(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::MissingVar(missing.to_string()));
        }
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let mut pairs = CREDS.to_vec();
        pairs[1] = ("YAYA_API_SECRET", "");
        assert_eq!(
            AppConfig::from_lookup(vars(&pairs)).unwrap_err(),
            ConfigError::MissingVar("YAYA_API_SECRET".to_string())
        );
    }

    #[test]
    fn test_default_limit_must_be_allowed() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("DEFAULT_LIMIT", "4"));
        assert!(matches!(
            AppConfig::from_lookup(vars(&pairs)),
            Err(ConfigError::InvalidValue { ref name, .. }) if name == "DEFAULT_LIMIT"
        ));

        let mut pairs = CREDS.to_vec();
        pairs.push(("DEFAULT_LIMIT", "10"));
        assert_eq!(AppConfig::from_lookup(vars(&pairs)).unwrap().default_limit, 10);
    }

    #[test]
    fn test_unparseable_numbers_are_rejected() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(matches!(
            AppConfig::from_lookup(vars(&pairs)),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rate_limit_and_cors_overrides() {
        let mut pairs = CREDS.to_vec();
        pairs.extend([
            ("RATE_LIMIT_MAX_REQUESTS", "10"),
            ("RATE_LIMIT_WINDOW_SECS", "60"),
            ("ENABLE_RATE_LIMITING", "false"),
            ("CLIENT_URL", "https://dash.example/, http://localhost:3000"),
        ]);
        let config = AppConfig::from_lookup(vars(&pairs)).unwrap();
        assert!(!config.enable_rate_limiting);
        assert_eq!(
            config.rate_limit,
            RateLimitConfig {
                max_requests: 10,
                window: Duration::from_secs(60)
            }
        );
        assert_eq!(
            config.cors_origins,
            vec![
                "https://dash.example".to_string(),
                "http://localhost:3000".to_string()
            ]
        );
    }

    #[test]
    fn test_wildcard_or_malformed_origin_is_rejected() {
        for client_url in ["*", "https://dash.example, *", "http://bad\nhost"] {
            let mut pairs = CREDS.to_vec();
            pairs.push(("CLIENT_URL", client_url));
            assert!(
                matches!(
                    AppConfig::from_lookup(vars(&pairs)),
                    Err(ConfigError::InvalidValue { ref name, .. }) if name == "CLIENT_URL"
                ),
                "CLIENT_URL={client_url:?}"
            );
        }
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("RATE_LIMIT_MAX_REQUESTS", "0"));
        assert!(AppConfig::from_lookup(vars(&pairs)).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig::from_lookup(vars(&CREDS)).unwrap();
        assert!(!format!("{:?}", config).contains("secret\""));
        assert!(!format!("{:?}", config.upstream.api_secret).contains("secret"));
    }
}
