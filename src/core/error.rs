//! Error types for loader construction and the service boundary.
//!
//! Scheduling itself never fails: unreachable resources are force-finished,
//! load errors count as finished and malformed submissions are no-ops. The
//! variants below cover the edges where a caller genuinely has to react.

use thiserror::Error;

/// Errors produced by loader components.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Builder was finalized without a host.
    #[error("loader builder requires a host")]
    MissingHost,
    /// The loader service task has stopped and no longer accepts commands.
    #[error("loader service closed")]
    ServiceClosed,
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
