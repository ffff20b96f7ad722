//! Configuration models for the loader.

pub mod loader;

pub use loader::{LoaderConfig, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS};
