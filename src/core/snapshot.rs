//! Progress snapshot handed to batch callbacks.

use serde::{Deserialize, Serialize};

use crate::core::{BatchId, CapabilityRecord, ResourceClass};

/// Read-only view of a class's loading progress at the moment a batch finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Class of the finished batch.
    pub class: ResourceClass,
    /// The finished batch.
    pub batch: BatchId,
    /// URLs still outstanding for the class, in-flight and queued.
    /// Zero exactly when nothing else is waiting.
    pub todo_count: usize,
    /// URLs left in the finished batch. Always zero at delivery.
    pub pending_count: usize,
    /// URLs of this class that reached a terminal state so far.
    pub done_count: u64,
    /// Every outstanding URL: `pending_set` followed by queued batches.
    pub todo_set: Vec<String>,
    /// Outstanding URLs of the finished batch.
    pub pending_set: Vec<String>,
    /// Fruitless poll ticks spent before the last URL finished.
    pub poll_attempts: u32,
    /// Capabilities the loader is running with.
    pub capabilities: CapabilityRecord,
}

impl ProgressSnapshot {
    pub(crate) fn new(
        class: ResourceClass,
        batch: BatchId,
        pending_set: Vec<String>,
        queued: Vec<String>,
        done_count: u64,
        poll_attempts: u32,
        capabilities: CapabilityRecord,
    ) -> Self {
        let mut todo_set = pending_set.clone();
        todo_set.extend(queued);
        Self {
            class,
            batch,
            todo_count: todo_set.len(),
            pending_count: pending_set.len(),
            done_count,
            todo_set,
            pending_set,
            poll_attempts,
            capabilities,
        }
    }

    /// Whether this was the last outstanding work of the class.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.todo_count == 0
    }

    /// URLs of batches that have not started yet.
    #[must_use]
    pub fn queued_set(&self) -> &[String] {
        self.todo_set.get(self.pending_count..).unwrap_or_default()
    }
}
