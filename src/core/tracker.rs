//! Completion tracking for the in-flight batch of a class.
//!
//! Every URL walks `Waiting -> Requested -> Finished(outcome)`. A failed or
//! force-finished URL is still finished: the queue must keep moving even when
//! a resource never confirms.

use serde::{Deserialize, Serialize};

use crate::core::batch::{Batch, BatchCallback};
use crate::core::{BatchId, Detection, NodeId, Strategy};

/// How a URL reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Native load signal, ready-state transition or positive poll.
    Loaded,
    /// Native error signal.
    Failed,
    /// Polling budget exhausted without confirmation.
    Forced,
}

/// Lifecycle of one URL inside the in-flight batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlState {
    /// Not dispatched yet (sequential strategy only).
    Waiting,
    /// Node inserted, waiting for a completion signal.
    Requested,
    /// Terminal.
    Finished(Outcome),
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub url: String,
    pub node: Option<NodeId>,
    pub state: UrlState,
}

/// The batch currently being loaded for a class.
pub(crate) struct InFlight<H, P> {
    pub id: BatchId,
    pub strategy: Strategy,
    pub detection: Detection,
    pub entries: Vec<Entry>,
    pub callback: Option<BatchCallback<H, P>>,
    pub payload: Option<P>,
    remaining: usize,
    failed: usize,
}

impl<H, P> InFlight<H, P> {
    pub fn new(batch: Batch<H, P>, strategy: Strategy, detection: Detection) -> Self {
        let entries: Vec<Entry> = batch
            .urls
            .into_iter()
            .map(|url| Entry {
                url,
                node: None,
                state: UrlState::Waiting,
            })
            .collect();
        Self {
            id: batch.id,
            strategy,
            detection,
            remaining: entries.len(),
            entries,
            callback: batch.callback,
            payload: batch.payload,
            failed: 0,
        }
    }

    /// Indices that may be dispatched right now.
    pub fn next_dispatchable(&self) -> Vec<usize> {
        match self.strategy {
            Strategy::Parallel => self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.state == UrlState::Waiting)
                .map(|(i, _)| i)
                .collect(),
            Strategy::Sequential => {
                if self.entries.iter().any(|e| e.state == UrlState::Requested) {
                    return Vec::new();
                }
                self.entries
                    .iter()
                    .position(|e| e.state == UrlState::Waiting)
                    .into_iter()
                    .collect()
            }
        }
    }

    pub fn mark_requested(&mut self, index: usize, node: NodeId) {
        let entry = &mut self.entries[index];
        entry.node = Some(node);
        entry.state = UrlState::Requested;
    }

    /// Move a requested URL to its terminal state. Returns false when the URL
    /// was not outstanding.
    pub fn finish(&mut self, index: usize, outcome: Outcome) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        if entry.state != UrlState::Requested {
            return false;
        }
        entry.state = UrlState::Finished(outcome);
        self.remaining -= 1;
        if outcome != Outcome::Loaded {
            self.failed += 1;
        }
        true
    }

    pub const fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    pub const fn unconfirmed(&self) -> usize {
        self.failed
    }

    /// URLs not finished yet, in caller order.
    pub fn pending_urls(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !matches!(e.state, UrlState::Finished(_)))
            .map(|e| e.url.clone())
            .collect()
    }

    /// Requested nodes with their URL, oldest first.
    pub fn requested(&self) -> Vec<(NodeId, String)> {
        self.entries
            .iter()
            .filter(|e| e.state == UrlState::Requested)
            .filter_map(|e| e.node.map(|n| (n, e.url.clone())))
            .collect()
    }
}

/// Verdict after a poll tick that confirmed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollVerdict {
    /// Budget left; poll again.
    KeepPolling,
    /// Budget spent; force-finish the oldest outstanding URL.
    Exhausted,
}

/// Bounded polling budget for a class.
///
/// Attempts reset whenever any URL of the class finishes, so a slow but
/// progressing batch never trips the cap.
#[derive(Debug, Clone)]
pub struct PollBudget {
    attempts: u32,
    max_attempts: u32,
    scheduled: bool,
}

impl PollBudget {
    /// Budget allowing `max_attempts` fruitless ticks.
    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            scheduled: false,
        }
    }

    /// Attempts spent since the last finish.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Count a fruitless tick.
    pub fn record_miss(&mut self) -> PollVerdict {
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            PollVerdict::Exhausted
        } else {
            PollVerdict::KeepPolling
        }
    }

    /// Reset the counter and return the attempts spent.
    pub fn take_attempts(&mut self) -> u32 {
        std::mem::take(&mut self.attempts)
    }

    pub(crate) const fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub(crate) fn set_scheduled(&mut self, scheduled: bool) {
        self.scheduled = scheduled;
    }
}
