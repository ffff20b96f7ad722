//! Loader configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Default delay between two poll ticks, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
/// Default number of fruitless poll ticks before a URL is force-finished.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 200;

/// Tunables of a [`crate::core::LazyLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Delay between poll ticks in milliseconds.
    pub poll_interval_ms: u64,
    /// Fruitless poll ticks tolerated before forcing a finish.
    pub max_poll_attempts: u32,
    /// Class name stamped on every created node.
    pub node_class: String,
    /// Charset attribute stamped on every created node.
    pub charset: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            node_class: "lazyload".into(),
            charset: "utf-8".into(),
        }
    }
}

impl LoaderConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than 0".into());
        }
        if self.max_poll_attempts == 0 {
            return Err("max_poll_attempts must be greater than 0".into());
        }
        if self.node_class.trim().is_empty() {
            return Err("node_class must not be empty".into());
        }
        if self.charset.trim().is_empty() {
            return Err("charset must not be empty".into());
        }
        Ok(())
    }

    /// Poll interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading loader config {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading loader config {}", path.display()))
    }

    /// Defaults overridden by `LAZYLOAD_*` environment variables.
    ///
    /// A `.env` file in the working directory is honoured if present.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `LAZYLOAD_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup("LAZYLOAD_POLL_INTERVAL_MS") {
            cfg.poll_interval_ms = v
                .trim()
                .parse()
                .map_err(|e| format!("LAZYLOAD_POLL_INTERVAL_MS: {e}"))?;
        }
        if let Some(v) = lookup("LAZYLOAD_MAX_POLL_ATTEMPTS") {
            cfg.max_poll_attempts = v
                .trim()
                .parse()
                .map_err(|e| format!("LAZYLOAD_MAX_POLL_ATTEMPTS: {e}"))?;
        }
        if let Some(v) = lookup("LAZYLOAD_NODE_CLASS") {
            cfg.node_class = v;
        }
        if let Some(v) = lookup("LAZYLOAD_CHARSET") {
            cfg.charset = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
