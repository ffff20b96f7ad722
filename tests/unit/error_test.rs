//! Tests for error types

use lazyload::core::{AppResult, LoaderError};

#[test]
fn test_invalid_config_error() {
    let err = LoaderError::InvalidConfig("poll_interval_ms must be greater than 0".to_string());
    assert_eq!(
        format!("{err}"),
        "invalid configuration: poll_interval_ms must be greater than 0"
    );
}

#[test]
fn test_missing_host_error() {
    let err = LoaderError::MissingHost;
    assert_eq!(format!("{err}"), "loader builder requires a host");
}

#[test]
fn test_service_closed_error() {
    let err = LoaderError::ServiceClosed;
    assert_eq!(format!("{err}"), "loader service closed");
}

#[test]
fn test_loader_error_converts_into_app_result() {
    fn fails() -> AppResult<()> {
        Err(LoaderError::MissingHost.into())
    }
    let err = fails().unwrap_err();
    assert!(err.downcast_ref::<LoaderError>().is_some());
}
