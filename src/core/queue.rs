//! Per-class batch queue and in-flight slot.

use std::collections::VecDeque;

use crate::core::batch::Batch;
use crate::core::tracker::{InFlight, PollBudget};
use crate::core::ResourceClass;

/// Occupancy of a class's single in-flight slot.
pub(crate) enum Slot<H, P> {
    /// Nothing loading; the next submit or advance promotes the queue head.
    Idle,
    /// A batch is loading.
    InFlight(InFlight<H, P>),
    /// The finished batch's callback is running; reentrant work only queues.
    Completing,
}

/// Queue state of one resource class.
pub(crate) struct ClassQueue<H, P> {
    pub class: ResourceClass,
    pub queued: VecDeque<Batch<H, P>>,
    pub slot: Slot<H, P>,
    pub done_count: u64,
    pub poll: PollBudget,
}

impl<H, P> ClassQueue<H, P> {
    pub fn new(class: ResourceClass, max_poll_attempts: u32) -> Self {
        Self {
            class,
            queued: VecDeque::new(),
            slot: Slot::Idle,
            done_count: 0,
            poll: PollBudget::new(max_poll_attempts),
        }
    }

    pub fn enqueue(&mut self, batch: Batch<H, P>, at_head: bool) {
        if at_head {
            self.queued.push_front(batch);
        } else {
            self.queued.push_back(batch);
        }
    }

    pub const fn is_idle(&self) -> bool {
        matches!(self.slot, Slot::Idle)
    }

    pub const fn in_flight(&self) -> Option<&InFlight<H, P>> {
        match &self.slot {
            Slot::InFlight(f) => Some(f),
            _ => None,
        }
    }

    pub fn in_flight_mut(&mut self) -> Option<&mut InFlight<H, P>> {
        match &mut self.slot {
            Slot::InFlight(f) => Some(f),
            _ => None,
        }
    }

    /// URLs of every not-yet-started batch, in queue order.
    pub fn queued_urls(&self) -> Vec<String> {
        self.queued.iter().flat_map(|b| b.urls.iter().cloned()).collect()
    }

    pub fn queued_url_count(&self) -> usize {
        self.queued.iter().map(|b| b.urls.len()).sum()
    }
}
