//! Deferred task queue
//!
//! Single-threaded, cancellable timers keyed by deadline on the scheduler's
//! own clock. Nothing here sleeps; the owner decides when time passes and
//! asks for whatever has become due.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timers ordered by deadline, ties broken by scheduling order
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Duration, TimerId), T>,
    deadlines: HashMap<TimerId, Duration>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `task` to fire at `deadline`
    pub fn schedule(&mut self, deadline: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a pending task
    ///
    /// Returns false if the task already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.entries.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        let (&(deadline, id), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        self.entries
            .remove(&(deadline, id))
            .map(|task| (deadline, task))
    }

    /// Deadline of the earliest pending task
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.entries.clear();
        self.deadlines.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
