use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_applies_default_timeouts() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[(API_URL_VAR, "https://api.example.test")])).unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.test");
    assert_eq!(cfg.timeouts, AuthTimeouts::default());
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_AUTH_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.timeouts.connect_secs, DEFAULT_AUTH_CONNECT_TIMEOUT_SECS);
}

#[test]
fn from_lookup_parses_timeout_overrides() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[
        (API_URL_VAR, "https://api.example.test"),
        (REQUEST_TIMEOUT_VAR, "42"),
        (CONNECT_TIMEOUT_VAR, " 7 "),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts, AuthTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_bad_timeout_falls_back_to_default() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[
        (API_URL_VAR, "https://api.example.test"),
        (REQUEST_TIMEOUT_VAR, "soon"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_AUTH_REQUEST_TIMEOUT_SECS);
}

#[test]
fn from_lookup_trims_trailing_slashes() {
    let cfg = SessionConfig::from_lookup(lookup_from(&[(API_URL_VAR, "https://api.example.test/v1//")])).unwrap();
    assert_eq!(cfg.api_base_url, "https://api.example.test/v1");
}

#[test]
fn from_lookup_missing_url_errors() {
    let err = SessionConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert_eq!(err, ConfigError::MissingVar { var: API_URL_VAR });
    assert!(err.to_string().contains("MINIAPP_API_URL"));
}

#[test]
fn from_lookup_blank_url_errors() {
    let err = SessionConfig::from_lookup(lookup_from(&[(API_URL_VAR, "  / ")])).unwrap_err();
    assert_eq!(err, ConfigError::EmptyVar { var: API_URL_VAR });
}

#[test]
fn timeouts_from_lookup_match_defaults_when_unset() {
    assert_eq!(AuthTimeouts::from_lookup(lookup_from(&[])), AuthTimeouts::default());
}

#[test]
fn timeouts_from_lookup_ignore_non_numeric_values() {
    let timeouts = AuthTimeouts::from_lookup(lookup_from(&[(REQUEST_TIMEOUT_VAR, "5"), (CONNECT_TIMEOUT_VAR, "-1")]));
    assert_eq!(timeouts, AuthTimeouts { request_secs: 5, connect_secs: DEFAULT_AUTH_CONNECT_TIMEOUT_SECS });
}
