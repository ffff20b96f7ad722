//! Poll timer that only records requests.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::{PollTimer, ResourceClass};

/// A recorded poll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollRequest {
    /// Class to tick.
    pub class: ResourceClass,
    /// Requested delay.
    pub delay: Duration,
}

/// Timer for hosts that drive [`crate::core::LazyLoader::poll_tick`] themselves,
/// e.g. from a frame loop or in tests.
///
/// Clones share the same request list.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    requests: Arc<Mutex<Vec<PollRequest>>>,
}

impl ManualTimer {
    /// Create an empty timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests not taken yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.requests.lock().len()
    }

    /// Drain recorded requests, oldest first.
    #[must_use]
    pub fn take(&self) -> Vec<PollRequest> {
        std::mem::take(&mut *self.requests.lock())
    }
}

impl PollTimer for ManualTimer {
    fn schedule_poll(&mut self, class: ResourceClass, delay: Duration) {
        self.requests.lock().push(PollRequest { class, delay });
    }
}
