//! Headless in-memory document.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::core::{Host, HostProbe, NodeId, NodeSpec};

#[derive(Debug, Default)]
struct DocumentState {
    probe: HostProbe,
    base: Option<Url>,
    next_id: u64,
    nodes: BTreeMap<NodeId, NodeSpec>,
    head: Vec<NodeId>,
    stylesheets: HashSet<String>,
    ready_sheets: HashSet<NodeId>,
}

impl DocumentState {
    fn resolve(&self, url: &str) -> String {
        self.base
            .as_ref()
            .and_then(|base| base.join(url).ok())
            .map_or_else(|| url.to_string(), String::from)
    }
}

/// Document that records node creation and insertion without fetching.
///
/// Cloning is cheap and every clone shares the same document, so a caller
/// can keep one clone to inspect the head and mark stylesheets as loaded
/// while the loader owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    state: Arc<Mutex<DocumentState>>,
}

impl InMemoryDocument {
    /// Create a document reporting `probe` to capability detection.
    #[must_use]
    pub fn new(probe: HostProbe) -> Self {
        Self {
            state: Arc::new(Mutex::new(DocumentState {
                probe,
                ..DocumentState::default()
            })),
        }
    }

    /// Resolve relative locations against `base`.
    pub fn with_base_url(self, base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base)?;
        self.state.lock().base = Some(base);
        Ok(self)
    }

    /// Nodes appended to the head, in insertion order.
    #[must_use]
    pub fn head(&self) -> Vec<NodeId> {
        self.state.lock().head.clone()
    }

    /// Locations of the nodes in the head, in insertion order.
    #[must_use]
    pub fn head_urls(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .head
            .iter()
            .filter_map(|id| state.nodes.get(id).map(|n| n.url.clone()))
            .collect()
    }

    /// Specification of a created node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeSpec> {
        self.state.lock().nodes.get(&id).cloned()
    }

    /// Most recently created node loading `url`.
    #[must_use]
    pub fn node_for_url(&self, url: &str) -> Option<NodeId> {
        self.state
            .lock()
            .nodes
            .iter()
            .rev()
            .find(|(_, spec)| spec.url == url)
            .map(|(id, _)| *id)
    }

    /// Number of nodes created so far.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.state.lock().nodes.len()
    }

    /// Make `href` (resolved against the base) appear in the stylesheet list.
    pub fn mark_stylesheet_loaded(&self, href: &str) {
        let mut state = self.state.lock();
        let resolved = state.resolve(href);
        state.stylesheets.insert(resolved);
    }

    /// Make the stylesheet rules of `node` readable.
    pub fn mark_sheet_ready(&self, node: NodeId) {
        self.state.lock().ready_sheets.insert(node);
    }
}

impl Host for InMemoryDocument {
    fn probe(&self) -> HostProbe {
        self.state.lock().probe.clone()
    }

    fn create_node(&mut self, spec: &NodeSpec) -> NodeId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = NodeId(state.next_id);
        state.nodes.insert(id, spec.clone());
        id
    }

    fn append_to_head(&mut self, node: NodeId) {
        let mut state = self.state.lock();
        if state.nodes.contains_key(&node) {
            state.head.push(node);
        } else {
            tracing::warn!(%node, "append of unknown node ignored");
        }
    }

    fn resolve_url(&self, url: &str) -> String {
        self.state.lock().resolve(url)
    }

    fn stylesheet_loaded(&self, href: &str) -> bool {
        self.state.lock().stylesheets.contains(href)
    }

    fn sheet_rules_available(&self, node: NodeId) -> bool {
        self.state.lock().ready_sheets.contains(&node)
    }
}
