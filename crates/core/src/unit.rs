//! All-or-nothing execution units.
//!
//! Every piece of state a liquidation can touch (token balances, allowances,
//! buffered events) implements [`Journaled`]. An [`ExecutionUnit`] takes a
//! checkpoint of each participant before running a closure, rolls all of them
//! back if the closure fails or panics, and commits only when the outermost
//! unit succeeds. Nested units fold into their parent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;

/// State that can be rolled back to an earlier checkpoint.
pub trait Journaled: Send + Sync {
    /// Mark the current position in the journal.
    fn checkpoint(&self) -> usize;

    /// Undo every change recorded after `checkpoint`.
    fn revert_to(&self, checkpoint: usize);

    /// Make every change recorded after `checkpoint` permanent.
    fn commit(&self, checkpoint: usize);

    /// The outermost unit has settled and no checkpoint is live. Anything
    /// still journaled can be dropped.
    fn release(&self) {}
}

pub struct ExecutionUnit {
    participants: Vec<Arc<dyn Journaled>>,
    depth: AtomicUsize,
}

impl ExecutionUnit {
    pub fn new(participants: Vec<Arc<dyn Journaled>>) -> Self {
        Self {
            participants,
            depth: AtomicUsize::new(0),
        }
    }

    /// Current nesting depth (0 when no unit is running).
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    /// Run `f` as one unit.
    pub fn run<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let mut frame = Frame {
            unit: self,
            checkpoints: self.participants.iter().map(|p| p.checkpoint()).collect(),
            depth: self.depth.fetch_add(1, Ordering::AcqRel),
            settled: false,
        };

        let result = f();
        match &result {
            Ok(_) => frame.commit(),
            Err(err) => {
                debug!(depth = frame.depth, error = %err, "Execution unit reverted");
                frame.revert();
            }
        }
        result
    }
}

/// One level of unit nesting. Reverts on drop unless settled, so a panic
/// inside the closure still rolls back.
struct Frame<'a> {
    unit: &'a ExecutionUnit,
    checkpoints: Vec<usize>,
    depth: usize,
    settled: bool,
}

impl Frame<'_> {
    fn commit(&mut self) {
        self.settled = true;
        if self.depth > 0 {
            return;
        }
        for (participant, checkpoint) in self.unit.participants.iter().zip(&self.checkpoints) {
            participant.commit(*checkpoint);
        }
        debug!("Execution unit committed");
    }

    fn revert(&mut self) {
        self.settled = true;
        let participants = self.unit.participants.iter().zip(&self.checkpoints);
        for (participant, checkpoint) in participants.rev() {
            participant.revert_to(*checkpoint);
        }
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.revert();
        }
        if self.depth == 0 {
            for participant in &self.unit.participants {
                participant.release();
            }
        }
        self.unit.depth.fetch_sub(1, Ordering::AcqRel);
    }
}
