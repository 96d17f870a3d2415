use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn from_lookup_uses_defaults_when_unset() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        HttpTimeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("DEALSCOUT_API_BASE_URL", "https://leads.example.test/v1/"),
        ("DEALSCOUT_REQUEST_TIMEOUT_SECS", "42"),
        ("DEALSCOUT_CONNECT_TIMEOUT_SECS", " 7 "),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "https://leads.example.test/v1");
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_falls_back_on_unparseable_timeouts() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("DEALSCOUT_REQUEST_TIMEOUT_SECS", "soon"),
        ("DEALSCOUT_CONNECT_TIMEOUT_SECS", "-1"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
}

#[test]
fn from_lookup_treats_zero_timeouts_as_unset() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("DEALSCOUT_REQUEST_TIMEOUT_SECS", "0"),
        ("DEALSCOUT_CONNECT_TIMEOUT_SECS", " 0 "),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
}

#[test]
fn from_lookup_rejects_non_http_base_url() {
    let err = ClientConfig::from_lookup(lookup_from(&[("DEALSCOUT_API_BASE_URL", "ftp://files.test")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidBaseUrl("ftp://files.test".to_owned()));
}

#[test]
fn from_lookup_rejects_empty_base_url() {
    assert!(ClientConfig::from_lookup(lookup_from(&[("DEALSCOUT_API_BASE_URL", "  ")])).is_err());
    assert!(ClientConfig::from_lookup(lookup_from(&[("DEALSCOUT_API_BASE_URL", "http://")])).is_err());
}

#[test]
fn with_base_url_overrides_and_trims() {
    let cfg = ClientConfig::default().with_base_url("http://10.0.0.5:9000/").unwrap();
    assert_eq!(cfg.base_url, "http://10.0.0.5:9000");
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
}
