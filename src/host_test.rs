use super::*;

// Unique env var names avoid races with parallel tests.

#[test]
fn static_source_returns_payload_verbatim() {
    let raw = "query_id=AAE&user=%7B%22id%22%3A1%7D&hash=abc ";
    let source = StaticInitData::new(Some(raw.to_owned()));
    assert!(source.is_available());
    assert_eq!(source.init_data().as_deref(), Some(raw));
}

#[test]
fn static_source_without_payload() {
    let source = StaticInitData::new(None);
    assert!(source.is_available());
    assert!(source.init_data().is_none());
}

#[test]
fn unavailable_source_reports_no_host() {
    let source = StaticInitData::unavailable();
    assert!(!source.is_available());
    assert!(source.init_data().is_none());
}

#[test]
fn env_source_reads_at_call_time() {
    let key = "__TEST_INIT_DATA_7731__";
    let source = EnvInitData::new(key);
    assert!(source.init_data().is_none());

    unsafe { std::env::set_var(key, "auth_date=1&hash=ff") };
    assert_eq!(source.init_data().as_deref(), Some("auth_date=1&hash=ff"));

    unsafe { std::env::remove_var(key) };
    assert!(source.init_data().is_none());
}

#[test]
fn env_source_defaults_to_standard_var() {
    let source = EnvInitData::default();
    assert!(source.is_available());
    assert_eq!(source.var, DEFAULT_INIT_DATA_VAR);
}
