//! Dispatch strategy, completion detection and node construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{CapabilityRecord, EngineClass, NodeKind, NodeSpec, ResourceClass};

/// How the URLs of one batch are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Every URL of the batch is dispatched at once.
    Parallel,
    /// One URL at a time, the next only after the previous one finished.
    Sequential,
}

impl Strategy {
    /// Pick the strategy for a class on a host.
    ///
    /// Stylesheet precedence follows document position, so styles always load
    /// in parallel. Scripts only do so when the host keeps execution order
    /// under concurrent fetch.
    #[must_use]
    pub const fn for_class(class: ResourceClass, caps: &CapabilityRecord) -> Self {
        match class {
            ResourceClass::Style => Self::Parallel,
            ResourceClass::Code if caps.ordered_concurrent_code => Self::Parallel,
            ResourceClass::Code => Self::Sequential,
        }
    }
}

/// Mechanism that tells the tracker a node is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detection {
    /// Native load/error events.
    NativeEvent,
    /// Ready-state transitions matching `loaded|complete`.
    ReadyState,
    /// Timed polling of the node's stylesheet rules.
    SheetRulesPoll,
    /// Timed polling of the document stylesheet list for the resolved href.
    StyleSheetListPoll,
}

impl Detection {
    /// Pick the detection mechanism for a class on a host.
    #[must_use]
    pub const fn for_class(class: ResourceClass, caps: &CapabilityRecord) -> Self {
        match (class, caps.engine) {
            (ResourceClass::Code, EngineClass::Trident) => Self::ReadyState,
            (ResourceClass::Style, EngineClass::Gecko) => Self::SheetRulesPoll,
            (ResourceClass::Style, EngineClass::WebKit) => Self::StyleSheetListPoll,
            _ => Self::NativeEvent,
        }
    }

    /// Whether completion is discovered by timed polling.
    #[must_use]
    pub const fn is_polled(self) -> bool {
        matches!(self, Self::SheetRulesPoll | Self::StyleSheetListPoll)
    }
}

/// Attributes stamped onto every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecoration {
    /// Class name marking nodes created by the loader.
    pub class_name: String,
    /// Character set attribute.
    pub charset: String,
}

/// Build the node description for one URL.
#[must_use]
pub fn node_spec(
    class: ResourceClass,
    url: &str,
    caps: &CapabilityRecord,
    decoration: &NodeDecoration,
) -> NodeSpec {
    let mut attributes = BTreeMap::new();
    let mut text = None;

    let kind = match class {
        ResourceClass::Code => {
            attributes.insert("src".to_string(), url.to_string());
            attributes.insert("async".to_string(), "false".to_string());
            NodeKind::Script
        }
        ResourceClass::Style if caps.engine == EngineClass::Gecko => {
            text = Some(format!("@import \"{url}\";"));
            NodeKind::ImportStyle
        }
        ResourceClass::Style => {
            attributes.insert("href".to_string(), url.to_string());
            attributes.insert("rel".to_string(), "stylesheet".to_string());
            attributes.insert("type".to_string(), "text/css".to_string());
            NodeKind::StylesheetLink
        }
    };

    attributes.insert("class".to_string(), decoration.class_name.clone());
    attributes.insert("charset".to_string(), decoration.charset.clone());

    NodeSpec {
        kind,
        url: url.to_string(),
        attributes,
        text,
    }
}
