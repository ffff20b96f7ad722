//! Builder assembling a loader from configuration.

use crate::config::LoaderConfig;
use crate::core::{CapabilityRecord, Host, LazyLoader, LoaderError, PollTimer};
use crate::infra::ManualTimer;

/// Validating constructor for [`LazyLoader`].
///
/// ```rust,ignore
/// let loader: LazyLoader<_, ()> = LoaderBuilder::new(LoaderConfig::from_env()?)
///     .host(InMemoryDocument::new(probe))
///     .build()?;
/// ```
pub struct LoaderBuilder<H> {
    config: LoaderConfig,
    host: Option<H>,
    timer: Option<Box<dyn PollTimer + Send>>,
    capabilities: Option<CapabilityRecord>,
}

impl<H> LoaderBuilder<H> {
    /// Start from `config`.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            host: None,
            timer: None,
            capabilities: None,
        }
    }

    /// Document the loader inserts nodes into.
    #[must_use]
    pub fn host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Timer driving poll ticks. Defaults to a [`ManualTimer`].
    #[must_use]
    pub fn timer(mut self, timer: impl PollTimer + Send + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    /// Skip host probing and use `capabilities`.
    #[must_use]
    pub fn capabilities(mut self, capabilities: CapabilityRecord) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Configuration the loader will use.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

impl<H: Host> LoaderBuilder<H> {
    /// Validate the configuration and build the loader.
    pub fn build<P>(self) -> Result<LazyLoader<H, P>, LoaderError> {
        self.config.validate().map_err(LoaderError::InvalidConfig)?;
        let host = self.host.ok_or(LoaderError::MissingHost)?;
        let timer = self
            .timer
            .unwrap_or_else(|| Box::new(ManualTimer::new()));

        let loader = LazyLoader::new(host, self.config, timer);
        Ok(match self.capabilities {
            Some(caps) => loader.with_capabilities(caps),
            None => loader,
        })
    }
}
