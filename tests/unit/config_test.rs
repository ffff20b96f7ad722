//! Tests for configuration validation

use std::collections::HashMap;

use lazyload::config::{LoaderConfig, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS};

#[test]
fn test_default_config_is_valid() {
    let config = LoaderConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    assert_eq!(config.max_poll_attempts, DEFAULT_MAX_POLL_ATTEMPTS);
    assert_eq!(config.node_class, "lazyload");
    assert_eq!(config.charset, "utf-8");
}

#[test]
fn test_config_invalid_poll_interval() {
    let invalid = LoaderConfig {
        poll_interval_ms: 0,
        ..LoaderConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_attempts() {
    let invalid = LoaderConfig {
        max_poll_attempts: 0,
        ..LoaderConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_node_class() {
    let invalid = LoaderConfig {
        node_class: "  ".into(),
        ..LoaderConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_from_json_fills_defaults() {
    let json = r#"{ "poll_interval_ms": 10 }"#;
    let config = LoaderConfig::from_json_str(json).unwrap();
    assert_eq!(config.poll_interval_ms, 10);
    assert_eq!(config.max_poll_attempts, DEFAULT_MAX_POLL_ATTEMPTS);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(LoaderConfig::from_json_str(r#"{ "max_poll_attempts": 0 }"#).is_err());
    assert!(LoaderConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_from_json_file() {
    let path = std::env::temp_dir().join(format!("lazyload-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "charset": "iso-8859-1" }"#).unwrap();
    let config = LoaderConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.charset, "iso-8859-1");

    let missing = LoaderConfig::from_json_file(path.with_extension("missing"));
    assert!(missing.is_err());
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("LAZYLOAD_POLL_INTERVAL_MS", "25"),
        ("LAZYLOAD_MAX_POLL_ATTEMPTS", " 40 "),
        ("LAZYLOAD_NODE_CLASS", "deferred"),
    ]);
    let config = LoaderConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.poll_interval_ms, 25);
    assert_eq!(config.max_poll_attempts, 40);
    assert_eq!(config.node_class, "deferred");
    assert_eq!(config.charset, "utf-8");
}

#[test]
fn test_config_from_lookup_rejects_garbage() {
    let result = LoaderConfig::from_lookup(|key| {
        (key == "LAZYLOAD_POLL_INTERVAL_MS").then(|| "soon".to_string())
    });
    assert!(result.unwrap_err().contains("LAZYLOAD_POLL_INTERVAL_MS"));
}
