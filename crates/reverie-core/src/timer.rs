//! Deadline-ordered timer queue.
//!
//! Every component that needs "run this later" owns a `TimerQueue` of its own
//! typed tasks. The host event loop asks each queue for its next deadline,
//! sleeps until then, and hands due tasks back to their owner. Tasks with the
//! same deadline come out in the order they were scheduled.

use std::collections::BTreeMap;
use std::time::Instant;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    deadline: Instant,
    seq: u64,
}

impl TimerId {
    /// The instant this task is due.
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// A queue of tasks keyed by deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<TimerId, T>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `task` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, task: T) -> TimerId {
        let id = TimerId {
            deadline,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.insert(id, task);
        id
    }

    /// Removes a pending task. Returns `None` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.entries.remove(&id)
    }

    /// Drops every pending task, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.entries.len();
        self.entries.clear();
        discarded
    }

    /// The earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.keys().next().map(TimerId::deadline)
    }

    /// Removes and returns the earliest task if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, T)> {
        let first = self.entries.first_key_value().map(|(id, _)| *id)?;
        if first.deadline > now {
            return None;
        }
        self.entries
            .remove(&first)
            .map(|task| (first.deadline, task))
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over pending tasks in firing order.
    pub fn iter(&self) -> impl Iterator<Item = (Instant, &T)> {
        self.entries.iter().map(|(id, task)| (id.deadline, task))
    }
}
