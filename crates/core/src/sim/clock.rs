//! Deterministic clock and an event sink that records what it receives.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::collaborators::{Clock, EventSink};
use crate::events::EngineEvent;

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::Release);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    /// Every event published so far, oldest first.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &EngineEvent) {
        self.events.lock().push(event.clone());
    }
}
