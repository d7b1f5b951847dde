//! Virtual time for the in-memory document.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Timer queue driven by explicit `advance` calls instead of wall time.
///
/// Tasks due at the same instant run in the order they were scheduled.
#[derive(Debug)]
pub struct VirtualClock<T> {
    now: Duration,
    next_seq: u64,
    due: BinaryHeap<Reverse<(Duration, u64)>>,
    tasks: HashMap<u64, T>,
}

impl<T> VirtualClock<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            due: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }

    /// Time elapsed since the clock started.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to run `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.due.push(Reverse((self.now + delay, seq)));
        self.tasks.insert(seq, task);
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock
    /// to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        let Reverse((at, seq)) = *self.due.peek()?;
        if at > deadline {
            return None;
        }
        self.due.pop();
        self.now = self.now.max(at);
        self.tasks.remove(&seq)
    }

    /// Move the clock forward to `to` (never backwards).
    pub fn set_now(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    /// Number of tasks still waiting.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl<T> Default for VirtualClock<T> {
    fn default() -> Self {
        Self::new()
    }
}
