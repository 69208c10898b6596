#![forbid(unsafe_code)]

//! Host-driven timers.
//!
//! The page never blocks and never owns a real clock. The host advances
//! [`DeterministicClock`] explicitly and [`TimerQueue`] hands back every
//! action whose deadline has passed.
//!
//! Each scheduled action carries a key. Scheduling a key that is already
//! pending replaces the earlier entry, so at most one action per key is ever
//! in flight and only the latest one runs.

use core::time::Duration;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward to `now`. Earlier instants are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Keyed queue of delayed actions.
#[derive(Debug, Clone)]
pub struct TimerQueue<K, A> {
    /// Ordered by `(deadline, sequence)` so ties fire in scheduling order.
    entries: BTreeMap<(Duration, u64), (K, A)>,
    index: HashMap<K, (Duration, u64)>,
    next_seq: u64,
}

impl<K, A> Default for TimerQueue<K, A> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Clone + Eq + Hash, A> TimerQueue<K, A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` at `deadline`, replacing any pending action for `key`.
    ///
    /// Returns the replaced action, if one was pending.
    pub fn schedule(&mut self, key: K, deadline: Duration, action: A) -> Option<A> {
        let replaced = self.cancel(&key);
        let slot = (deadline, self.next_seq);
        self.next_seq += 1;
        self.index.insert(key.clone(), slot);
        self.entries.insert(slot, (key, action));
        replaced
    }

    /// Drop the pending action for `key`.
    pub fn cancel(&mut self, key: &K) -> Option<A> {
        let slot = self.index.remove(key)?;
        self.entries.remove(&slot).map(|(_, action)| action)
    }

    /// Pending action for `key`, if any.
    #[must_use]
    pub fn pending(&self, key: &K) -> Option<&A> {
        let slot = self.index.get(key)?;
        self.entries.get(slot).map(|(_, action)| action)
    }

    /// Remove and return every action due at or before `now`, in firing order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<A> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let (key, action) = entry.remove();
            self.index.remove(&key);
            due.push(action);
        }
        due
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|&(deadline, _)| deadline)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
