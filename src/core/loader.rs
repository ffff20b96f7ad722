//! The lazy loader: per-class queues, dispatch and completion handling.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::LoaderConfig;
use crate::core::batch::{Batch, BatchRequest};
use crate::core::dispatch::{node_spec, NodeDecoration};
use crate::core::queue::{ClassQueue, Slot};
use crate::core::tracker::{InFlight, Outcome, PollVerdict};
use crate::core::{
    BatchId, CapabilityRecord, Detection, Flow, Host, LoadSignal, NodeId, PollTimer,
    ProgressSnapshot, ResourceClass, Strategy,
};

/// Where a dispatched node belongs.
#[derive(Debug, Clone, Copy)]
struct NodeRef {
    class: ResourceClass,
    batch: BatchId,
    index: usize,
}

/// Point-in-time counters of one class queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Class the counters belong to.
    pub class: ResourceClass,
    /// Batches waiting behind the in-flight one.
    pub queued_batches: usize,
    /// URLs across waiting batches.
    pub queued_urls: usize,
    /// Unfinished URLs of the in-flight batch.
    pub in_flight_urls: usize,
    /// URLs of this class that reached a terminal state.
    pub done_count: u64,
    /// Whether a batch is loading or completing.
    pub busy: bool,
    /// Idle with work queued: a callback halted the queue.
    pub halted: bool,
}

/// Scheduler that loads scripts and stylesheets on demand.
///
/// Each [`ResourceClass`] owns an independent FIFO of batches and a single
/// in-flight slot. A batch's callback fires exactly once, after its last URL
/// finished, and the next batch is only promoted after that callback
/// returned without halting.
///
/// The loader is a plain `&mut self` state machine. The host feeds it
/// [`LazyLoader::signal`] and [`LazyLoader::poll_tick`] calls from the same
/// thread that submits work; multi-threaded hosts should go through
/// `runtime::LoaderService`.
pub struct LazyLoader<H, P = ()> {
    host: H,
    timer: Box<dyn PollTimer + Send>,
    config: LoaderConfig,
    decoration: NodeDecoration,
    capabilities: OnceLock<CapabilityRecord>,
    queues: [ClassQueue<H, P>; 2],
    nodes: HashMap<NodeId, NodeRef>,
}

impl<H: Host, P> LazyLoader<H, P> {
    /// Create a loader over `host`, polling through `timer`.
    ///
    /// The configuration is expected to be valid; see
    /// [`crate::builders::LoaderBuilder`] for the validating constructor.
    pub fn new(host: H, config: LoaderConfig, timer: Box<dyn PollTimer + Send>) -> Self {
        let decoration = NodeDecoration {
            class_name: config.node_class.clone(),
            charset: config.charset.clone(),
        };
        let queues = [
            ClassQueue::new(ResourceClass::Code, config.max_poll_attempts),
            ClassQueue::new(ResourceClass::Style, config.max_poll_attempts),
        ];
        Self {
            host,
            timer,
            config,
            decoration,
            capabilities: OnceLock::new(),
            queues,
            nodes: HashMap::new(),
        }
    }

    /// Use `capabilities` instead of probing the host, replacing any record
    /// probed earlier.
    #[must_use]
    pub fn with_capabilities(self, capabilities: CapabilityRecord) -> Self {
        Self {
            capabilities: OnceLock::from(capabilities),
            ..self
        }
    }

    /// Host capabilities, probed on first use and fixed afterwards.
    pub fn capabilities(&self) -> CapabilityRecord {
        *self
            .capabilities
            .get_or_init(|| CapabilityRecord::detect(&self.host.probe()))
    }

    /// The host the loader inserts nodes into.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active configuration.
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load scripts. See [`LazyLoader::submit`].
    pub fn load_code(&mut self, request: BatchRequest<H, P>) -> Vec<NodeId> {
        self.submit(ResourceClass::Code, request)
    }

    /// Load stylesheets. See [`LazyLoader::submit`].
    pub fn load_style(&mut self, request: BatchRequest<H, P>) -> Vec<NodeId> {
        self.submit(ResourceClass::Style, request)
    }

    /// Queue a batch for `class` and start loading if the class is idle.
    ///
    /// Returns the nodes created by this call. That is empty when the batch
    /// only got queued, and belongs to an older batch when a halted queue was
    /// resumed. A request without usable URLs is ignored.
    pub fn submit(&mut self, class: ResourceClass, request: BatchRequest<H, P>) -> Vec<NodeId> {
        let BatchRequest {
            urls,
            callback,
            payload,
            insert_at_head,
        } = request;

        let (urls, dropped) = urls.normalize();
        if dropped > 0 {
            tracing::warn!(%class, dropped, "dropping blank resource locations");
        }
        if urls.is_empty() {
            tracing::warn!(%class, "ignoring submission without resource locations");
            return Vec::new();
        }

        let batch = Batch::new(urls, callback, payload);
        tracing::debug!(
            %class,
            batch = %batch.id,
            urls = batch.urls.len(),
            insert_at_head,
            "batch submitted"
        );
        self.queues[class.index()].enqueue(batch, insert_at_head);
        self.advance(class)
    }

    /// Promote the next queued batch of `class` if the class is idle.
    ///
    /// No-op while a batch is in flight or its callback is running.
    pub fn advance(&mut self, class: ResourceClass) -> Vec<NodeId> {
        let caps = self.capabilities();
        let queue = &mut self.queues[class.index()];
        if !queue.is_idle() {
            return Vec::new();
        }
        let Some(batch) = queue.queued.pop_front() else {
            return Vec::new();
        };

        let strategy = Strategy::for_class(class, &caps);
        let detection = Detection::for_class(class, &caps);
        tracing::info!(
            %class,
            batch = %batch.id,
            urls = batch.urls.len(),
            ?strategy,
            ?detection,
            "batch promoted"
        );
        queue.slot = Slot::InFlight(InFlight::new(batch, strategy, detection));
        self.dispatch_ready(class)
    }

    /// Deliver a completion signal for `node`.
    ///
    /// Signals for unknown or already finished nodes are ignored, as are
    /// ready-state transitions that do not mean "loaded".
    pub fn signal(&mut self, node: NodeId, signal: LoadSignal) {
        let outcome = match &signal {
            LoadSignal::Load => Outcome::Loaded,
            LoadSignal::Error => Outcome::Failed,
            LoadSignal::ReadyState(state) if LoadSignal::is_ready_state_done(state) => {
                Outcome::Loaded
            }
            LoadSignal::ReadyState(state) => {
                tracing::trace!(%node, state = state.as_str(), "ready state still loading");
                return;
            }
        };
        self.finish_node(node, outcome);
    }

    /// Run one poll tick for `class`.
    ///
    /// Finishes every polled node the host confirms. A tick that confirms
    /// nothing uses up one attempt; once the budget is spent the oldest
    /// outstanding node is finished anyway so the queue cannot stall.
    pub fn poll_tick(&mut self, class: ResourceClass) {
        let queue = &mut self.queues[class.index()];
        queue.poll.set_scheduled(false);
        let Some(in_flight) = queue.in_flight() else {
            return;
        };
        let detection = in_flight.detection;
        if !detection.is_polled() {
            return;
        }
        let requested = in_flight.requested();
        if requested.is_empty() {
            return;
        }

        let confirmed: Vec<NodeId> = requested
            .iter()
            .filter(|(node, url)| match detection {
                Detection::SheetRulesPoll => self.host.sheet_rules_available(*node),
                Detection::StyleSheetListPoll => self.host.stylesheet_loaded(url),
                Detection::NativeEvent | Detection::ReadyState => false,
            })
            .map(|(node, _)| *node)
            .collect();

        if confirmed.is_empty() {
            let verdict = self.queues[class.index()].poll.record_miss();
            if verdict == PollVerdict::Exhausted {
                let (node, url) = &requested[0];
                tracing::warn!(
                    %class,
                    %node,
                    url = url.as_str(),
                    attempts = self.config.max_poll_attempts,
                    "no completion after polling budget, finishing anyway"
                );
                self.finish_node(*node, Outcome::Forced);
            }
        } else {
            for node in confirmed {
                self.finish_node(node, Outcome::Loaded);
            }
        }

        self.ensure_polling(class);
    }

    /// Counters for `class`.
    pub fn stats(&self, class: ResourceClass) -> ClassStats {
        let queue = &self.queues[class.index()];
        let queued_batches = queue.queued.len();
        ClassStats {
            class: queue.class,
            queued_batches,
            queued_urls: queue.queued_url_count(),
            in_flight_urls: queue.in_flight().map_or(0, InFlight::remaining),
            done_count: queue.done_count,
            busy: !queue.is_idle(),
            halted: queue.is_idle() && queued_batches > 0,
        }
    }

    /// Every outstanding URL of `class`: in-flight first, then queued.
    pub fn outstanding(&self, class: ResourceClass) -> Vec<String> {
        let queue = &self.queues[class.index()];
        let mut urls = queue.in_flight().map(InFlight::pending_urls).unwrap_or_default();
        urls.extend(queue.queued_urls());
        urls
    }

    /// Create and insert nodes for whatever the in-flight batch allows now.
    fn dispatch_ready(&mut self, class: ResourceClass) -> Vec<NodeId> {
        let caps = self.capabilities();
        let Some(in_flight) = self.queues[class.index()].in_flight_mut() else {
            return Vec::new();
        };

        let batch = in_flight.id;
        let detection = in_flight.detection;
        let indices = in_flight.next_dispatchable();
        let mut nodes = Vec::with_capacity(indices.len());

        for index in indices {
            let url = in_flight.entries[index].url.clone();
            let spec = node_spec(class, &url, &caps, &self.decoration);
            let node = self.host.create_node(&spec);
            if detection == Detection::StyleSheetListPoll {
                // The stylesheet list reports absolute hrefs.
                in_flight.entries[index].url = self.host.resolve_url(&url);
            }
            in_flight.mark_requested(index, node);
            self.nodes.insert(node, NodeRef { class, batch, index });
            tracing::debug!(%class, %batch, %node, url = url.as_str(), "node dispatched");
            nodes.push(node);
        }

        for node in &nodes {
            self.host.append_to_head(*node);
        }

        if detection.is_polled() && !nodes.is_empty() {
            self.ensure_polling(class);
        }
        nodes
    }

    /// Schedule a poll tick if polled nodes are outstanding and none is pending.
    fn ensure_polling(&mut self, class: ResourceClass) {
        let interval = self.config.poll_interval();
        let queue = &mut self.queues[class.index()];
        if queue.poll.is_scheduled() {
            return;
        }
        let needs_poll = queue
            .in_flight()
            .is_some_and(|f| f.detection.is_polled() && !f.requested().is_empty());
        if needs_poll {
            queue.poll.set_scheduled(true);
            self.timer.schedule_poll(class, interval);
        }
    }

    /// Move one node to its terminal state and react to it.
    fn finish_node(&mut self, node: NodeId, outcome: Outcome) {
        let Some(node_ref) = self.nodes.remove(&node) else {
            tracing::debug!(%node, "signal for unknown or finished node ignored");
            return;
        };
        let class = node_ref.class;
        let queue = &mut self.queues[class.index()];
        let Some(in_flight) = queue.in_flight_mut() else {
            return;
        };
        if in_flight.id != node_ref.batch || !in_flight.finish(node_ref.index, outcome) {
            return;
        }
        let complete = in_flight.is_complete();
        let url = in_flight.entries[node_ref.index].url.clone();

        queue.done_count += 1;
        let attempts = queue.poll.take_attempts();
        match outcome {
            Outcome::Loaded => {
                tracing::debug!(%class, %node, url = url.as_str(), "resource finished");
            }
            Outcome::Failed => {
                tracing::warn!(%class, %node, url = url.as_str(), "resource failed to load");
            }
            Outcome::Forced => {
                tracing::warn!(%class, %node, url = url.as_str(), "resource force-finished");
            }
        }

        if complete {
            self.complete_batch(class, attempts);
        } else {
            self.dispatch_ready(class);
        }
    }

    /// Deliver the callback of the finished in-flight batch and move on.
    fn complete_batch(&mut self, class: ResourceClass, poll_attempts: u32) {
        let capabilities = self.capabilities();
        let queue = &mut self.queues[class.index()];
        let in_flight = match std::mem::replace(&mut queue.slot, Slot::Completing) {
            Slot::InFlight(in_flight) => in_flight,
            other => {
                queue.slot = other;
                return;
            }
        };

        let snapshot = ProgressSnapshot::new(
            class,
            in_flight.id,
            in_flight.pending_urls(),
            queue.queued_urls(),
            queue.done_count,
            poll_attempts,
            capabilities,
        );
        tracing::info!(
            %class,
            batch = %in_flight.id,
            unconfirmed = in_flight.unconfirmed(),
            todo = snapshot.todo_count,
            done = snapshot.done_count,
            "batch complete"
        );

        let InFlight {
            callback, payload, ..
        } = in_flight;
        let flow = callback.map_or(Flow::Continue, |callback| callback(self, payload, &snapshot));

        self.queues[class.index()].slot = Slot::Idle;
        if flow.is_halt() {
            tracing::info!(%class, "queue halted by callback");
        } else {
            self.advance(class);
        }
    }
}

impl<H, P> std::fmt::Debug for LazyLoader<H, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyLoader")
            .field("config", &self.config)
            .field("capabilities", &self.capabilities.get())
            .field("tracked_nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}
