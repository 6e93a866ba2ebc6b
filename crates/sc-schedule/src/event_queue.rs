//! `EventQueue` — time-ordered queue of triggered events.
//!
//! `BTreeMap` gives O(log W) insert and pop where W is the number of
//! distinct pending times.  Each time bucket is a `VecDeque`, so events
//! pushed for the same time pop in push order, including events pushed
//! while that bucket is being drained.

use std::collections::{BTreeMap, VecDeque};

use sc_core::{EventId, SimTime};

/// A priority queue mapping simulated times to events due at that time.
#[derive(Default)]
pub struct EventQueue {
    inner: BTreeMap<SimTime, VecDeque<EventId>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `event` to be processed at `time`, after everything already
    /// queued for that same time.
    pub fn push(&mut self, time: SimTime, event: EventId) {
        self.inner.entry(time).or_default().push_back(event);
        self.total += 1;
    }

    /// Pop the first event due at or before `until`.
    pub fn pop_due(&mut self, until: SimTime) -> Option<(SimTime, EventId)> {
        let mut entry = self.inner.first_entry()?;
        let time = *entry.key();
        if time > until {
            return None;
        }
        let event = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.total -= 1;
        Some((time, event))
    }

    /// The earliest time with at least one queued event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of queued events.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future times that have at least one queued event.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }
}
