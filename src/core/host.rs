//! Host-facing seams: node creation, completion probes and poll timers.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{HostProbe, ResourceClass};

/// Handle of a loadable node created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Element flavour the host must create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// `<script src=...>`.
    Script,
    /// `<link rel="stylesheet" href=...>`.
    StylesheetLink,
    /// `<style>@import "...";</style>`, used where link nodes give no load signal.
    ImportStyle,
}

/// Everything the host needs to build one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Element flavour.
    pub kind: NodeKind,
    /// Location the node loads.
    pub url: String,
    /// Attributes and properties to set on the element.
    pub attributes: BTreeMap<String, String>,
    /// Text content, if any.
    pub text: Option<String>,
}

impl NodeSpec {
    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Completion signal delivered by the host for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSignal {
    /// Native load event.
    Load,
    /// Native error event.
    Error,
    /// Ready-state transition carrying the new state string.
    ReadyState(String),
}

impl LoadSignal {
    /// Whether a ready-state string means the resource is done.
    #[must_use]
    pub fn is_ready_state_done(state: &str) -> bool {
        state.contains("loaded") || state.contains("complete")
    }
}

/// The document a loader inserts nodes into.
///
/// Implementations wrap a real DOM, a headless document, or a test double.
/// All calls happen on the loader's thread.
pub trait Host {
    /// Facts used for capability detection. Called at most once per loader.
    fn probe(&self) -> HostProbe;

    /// Create a detached node and return its handle.
    fn create_node(&mut self, spec: &NodeSpec) -> NodeId;

    /// Append a previously created node to the document head.
    fn append_to_head(&mut self, node: NodeId);

    /// Resolve a possibly relative location against the document base.
    fn resolve_url(&self, url: &str) -> String {
        url.to_string()
    }

    /// Whether the document stylesheet list contains a sheet with this href.
    fn stylesheet_loaded(&self, href: &str) -> bool;

    /// Whether the stylesheet attached to `node` exposes its rules yet.
    fn sheet_rules_available(&self, node: NodeId) -> bool;
}

/// Schedules a future [`crate::core::LazyLoader::poll_tick`] call.
pub trait PollTimer {
    /// Request a poll tick for `class` after `delay`.
    fn schedule_poll(&mut self, class: ResourceClass, delay: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_pattern() {
        assert!(LoadSignal::is_ready_state_done("loaded"));
        assert!(LoadSignal::is_ready_state_done("complete"));
        assert!(!LoadSignal::is_ready_state_done("loading"));
        assert!(!LoadSignal::is_ready_state_done("interactive"));
    }
}
