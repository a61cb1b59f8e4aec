use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TABLE_NAME: &str = "sanca";
pub const DEFAULT_BUCKET_NAME: &str = "sanca-listing-images";
pub const DEFAULT_PRESIGN_EXPIRES_SECS: u64 = 15 * 60;
pub const DEFAULT_CORS_ORIGIN: &str = "*";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Settings for the API lambda
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub table_name: String,
    pub bucket_name: String,
    pub presign_expires: Duration,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        AppConfig {
            table_name: non_empty(lookup("TABLE_NAME")).unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            bucket_name: non_empty(lookup("S3_BUCKET_NAME")).unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string()),
            presign_expires: Duration::from_secs(parse_or(
                "PRESIGN_EXPIRES_SECS",
                lookup("PRESIGN_EXPIRES_SECS"),
                DEFAULT_PRESIGN_EXPIRES_SECS,
            )),
            cors_origin: non_empty(lookup("CORS_ORIGIN")).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        }
    }
}

/// Settings for `MarketplaceClient`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = non_empty(lookup("SANCA_API_URL")).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(parse_or(
                "SANCA_API_TIMEOUT_SECS",
                lookup("SANCA_API_TIMEOUT_SECS"),
                DEFAULT_API_TIMEOUT_SECS,
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, value: Option<String>, default: T) -> T {
    match non_empty(value) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("⚠️ Invalid {}={:?}, falling back to {}", key, raw, default);
            default
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
