use super::*;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn app_config_defaults() {
    let config = AppConfig::from_lookup(lookup(&[]));
    assert_eq!(config.table_name, "sanca");
    assert_eq!(config.bucket_name, "sanca-listing-images");
    assert_eq!(config.presign_expires, Duration::from_secs(900));
    assert_eq!(config.cors_origin, "*");
}

#[test]
fn app_config_reads_overrides() {
    let config = AppConfig::from_lookup(lookup(&[
        ("TABLE_NAME", "sanca-dev"),
        ("S3_BUCKET_NAME", "dev-bucket"),
        ("PRESIGN_EXPIRES_SECS", "60"),
        ("CORS_ORIGIN", "https://sanca.app"),
    ]));
    assert_eq!(config.table_name, "sanca-dev");
    assert_eq!(config.bucket_name, "dev-bucket");
    assert_eq!(config.presign_expires, Duration::from_secs(60));
    assert_eq!(config.cors_origin, "https://sanca.app");
}

#[test]
fn blank_and_invalid_values_fall_back() {
    let config = AppConfig::from_lookup(lookup(&[("TABLE_NAME", "  "), ("PRESIGN_EXPIRES_SECS", "soon")]));
    assert_eq!(config.table_name, "sanca");
    assert_eq!(config.presign_expires, Duration::from_secs(900));
}

#[test]
fn client_config_trims_trailing_slash() {
    let config = ClientConfig::from_lookup(lookup(&[
        ("SANCA_API_URL", "https://api.sanca.app/"),
        ("SANCA_API_TIMEOUT_SECS", "5"),
    ]));
    assert_eq!(config.base_url, "https://api.sanca.app");
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn client_config_defaults() {
    let config = ClientConfig::from_lookup(lookup(&[]));
    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.timeout, Duration::from_secs(30));
}
