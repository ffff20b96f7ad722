//! Host capability detection.
//!
//! The host is inspected once and reduced to a [`CapabilityRecord`]; every
//! dispatch decision afterwards branches on that record instead of sniffing
//! the host again.

use serde::{Deserialize, Serialize};

/// Raw facts reported by a host about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProbe {
    /// User agent string of the host engine.
    pub user_agent: String,
    /// Whether freshly created script nodes default to `async = true`, which
    /// means the engine honours `async = false` to keep execution order under
    /// concurrent fetch.
    pub script_async_default: bool,
}

impl HostProbe {
    /// Probe with the given user agent and no async-ordering support.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            script_async_default: false,
        }
    }

    /// Set the async-ordering feature flag.
    #[must_use]
    pub fn with_script_async(mut self, supported: bool) -> Self {
        self.script_async_default = supported;
        self
    }
}

/// Rendering engine family, as far as loading behaviour is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineClass {
    /// Safari, Chrome and other `AppleWebKit/` engines.
    WebKit,
    /// Internet Explorer (`MSIE`).
    Trident,
    /// Legacy Opera.
    Presto,
    /// Firefox and other `Gecko/` engines.
    Gecko,
    /// Anything not recognised.
    Unknown,
}

impl EngineClass {
    /// Classify a user agent string. First match wins.
    #[must_use]
    pub fn sniff(user_agent: &str) -> Self {
        if user_agent.contains("AppleWebKit/") {
            Self::WebKit
        } else if user_agent.contains("MSIE") {
            Self::Trident
        } else if user_agent.contains("Opera") {
            Self::Presto
        } else if user_agent.contains("Gecko/") {
            Self::Gecko
        } else {
            Self::Unknown
        }
    }
}

/// Immutable summary of what the host can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    /// Scripts may be fetched concurrently while still executing in order.
    pub ordered_concurrent_code: bool,
    /// Engine family, selects completion detection mechanisms.
    pub engine: EngineClass,
}

impl CapabilityRecord {
    /// Derive the record from a host probe.
    #[must_use]
    pub fn detect(probe: &HostProbe) -> Self {
        let engine = EngineClass::sniff(&probe.user_agent);
        let ordered_concurrent_code = probe.script_async_default
            || matches!(engine, EngineClass::Gecko | EngineClass::Presto);
        tracing::debug!(
            ?engine,
            ordered_concurrent_code,
            "host capabilities detected"
        );
        Self {
            ordered_concurrent_code,
            engine,
        }
    }

    /// Fully sequential record for hosts nothing is known about.
    #[must_use]
    pub const fn conservative() -> Self {
        Self {
            ordered_concurrent_code: false,
            engine: EngineClass::Unknown,
        }
    }
}

impl Default for CapabilityRecord {
    fn default() -> Self {
        Self::conservative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 5_0 like Mac OS X) AppleWebKit/534.46 (KHTML, like Gecko) Version/5.1 Mobile/9A334 Safari/7534.48.3";
    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:10.0) Gecko/20100101 Firefox/10.0";
    const IE8: &str = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; Trident/4.0)";
    const OPERA: &str = "Opera/9.80 (Windows NT 6.1; U; en) Presto/2.9.168 Version/11.50";

    #[test]
    fn test_engine_sniffing() {
        assert_eq!(EngineClass::sniff(SAFARI), EngineClass::WebKit);
        assert_eq!(EngineClass::sniff(FIREFOX), EngineClass::Gecko);
        assert_eq!(EngineClass::sniff(IE8), EngineClass::Trident);
        assert_eq!(EngineClass::sniff(OPERA), EngineClass::Presto);
        assert_eq!(EngineClass::sniff("curl/8.0"), EngineClass::Unknown);
    }

    #[test]
    fn test_webkit_lists_gecko_in_ua_but_stays_webkit() {
        // "like Gecko" has no slash, and WebKit is matched first anyway.
        assert_eq!(EngineClass::sniff(SAFARI), EngineClass::WebKit);
    }

    #[test]
    fn test_ordered_concurrency() {
        assert!(CapabilityRecord::detect(&HostProbe::new(FIREFOX)).ordered_concurrent_code);
        assert!(CapabilityRecord::detect(&HostProbe::new(OPERA)).ordered_concurrent_code);
        assert!(!CapabilityRecord::detect(&HostProbe::new(SAFARI)).ordered_concurrent_code);
        assert!(!CapabilityRecord::detect(&HostProbe::new(IE8)).ordered_concurrent_code);
        assert!(
            CapabilityRecord::detect(&HostProbe::new(SAFARI).with_script_async(true))
                .ordered_concurrent_code
        );
    }

    #[test]
    fn test_unknown_host_is_conservative() {
        let record = CapabilityRecord::detect(&HostProbe::default());
        assert_eq!(record, CapabilityRecord::conservative());
    }
}
