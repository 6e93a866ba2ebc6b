//! `Scheduler` — the discrete-event kernel.
//!
//! # Events
//!
//! An event is created *pending* ([`Scheduler::new_event`]) or already
//! *triggered* with a value ([`Scheduler::schedule_timeout`],
//! [`Scheduler::schedule_at`]).  A pending event is triggered once by
//! [`Scheduler::succeed`].  Triggered events are queued by time; when one is
//! popped it is *processed*: its waiters fire in registration order and the
//! event is dropped.  Waiting on a processed event is a
//! [`ScheduleError::StaleEvent`].
//!
//! # Composite waits
//!
//! [`Scheduler::any_of`] returns an event that triggers with the value of
//! whichever child is processed first.  The losing child stays in the arena
//! until it is processed or [`Scheduler::discard`]ed; its late firing is
//! ignored by the already-triggered composite.
//!
//! # Processes
//!
//! A process is an id plus "the event it currently waits on".  All of its
//! state lives in the [`ProcessHost`], which is resumed with the value of the
//! event the process was waiting on and must register the next wait (or
//! let the process end by not waiting again).

use std::collections::HashMap;

use sc_core::{EventId, ProcessId, SimTime};
use tracing::trace;

use crate::{EventQueue, ScheduleError, ScheduleResult};

// ── ProcessHost ───────────────────────────────────────────────────────────────

/// Owner of process state; called back when a process's event fires.
pub trait ProcessHost<V> {
    type Error;

    /// Resume `process` with the value of the event it was waiting on.
    ///
    /// An error aborts [`Scheduler::run_until`] and is returned from it.
    fn resume(
        &mut self,
        sched: &mut Scheduler<V>,
        process: ProcessId,
        value: V,
    ) -> Result<(), Self::Error>;
}

// ── Internal state ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
enum Waiter {
    Process(ProcessId),
    AnyOf(EventId),
}

struct EventSlot<V> {
    /// `Some` once triggered.
    value: Option<V>,
    waiters: Vec<Waiter>,
}

impl<V> EventSlot<V> {
    fn pending() -> Self {
        Self { value: None, waiters: Vec::new() }
    }

    fn triggered(value: V) -> Self {
        Self { value: Some(value), waiters: Vec::new() }
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Event arena, time-ordered queue, and simulated clock.
pub struct Scheduler<V> {
    now: SimTime,
    next_event: u64,
    events: HashMap<EventId, EventSlot<V>>,
    queue: EventQueue,
    /// Indexed by `ProcessId`: the event each process is suspended on.
    waiting: Vec<Option<EventId>>,
}

impl<V: Clone> Default for Scheduler<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Scheduler<V> {
    pub fn new() -> Self {
        Self {
            now: SimTime::ZERO,
            next_event: 0,
            events: HashMap::new(),
            queue: EventQueue::new(),
            waiting: Vec::new(),
        }
    }

    /// Current simulated time.  Never decreases.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Time of the next queued event, if any.
    pub fn peek(&self) -> Option<SimTime> {
        self.queue.next_time()
    }

    /// Number of events that exist and have not been processed.
    pub fn live_events(&self) -> usize {
        self.events.len()
    }

    pub fn process_count(&self) -> usize {
        self.waiting.len()
    }

    // ── Events ────────────────────────────────────────────────────────────

    fn alloc(&mut self, slot: EventSlot<V>) -> EventId {
        let id = EventId(self.next_event);
        self.next_event += 1;
        self.events.insert(id, slot);
        id
    }

    /// A pending event, triggered later by [`Scheduler::succeed`].
    pub fn new_event(&mut self) -> EventId {
        self.alloc(EventSlot::pending())
    }

    /// An event that fires `delay` time units from now carrying `value`.
    pub fn schedule_timeout(&mut self, delay: f64, value: V) -> ScheduleResult<EventId> {
        if delay.is_nan() || delay < 0.0 {
            return Err(ScheduleError::NegativeDelay(delay));
        }
        self.schedule_at(self.now + delay, value)
    }

    /// An event that fires at absolute time `time` (clamped to now).
    ///
    /// Used where the caller already holds an exact timestamp, so repeated
    /// `now + delay` additions cannot drift.
    pub fn schedule_at(&mut self, time: SimTime, value: V) -> ScheduleResult<EventId> {
        if time.as_f64().is_nan() {
            return Err(ScheduleError::NegativeDelay(f64::NAN));
        }
        let time = time.max(self.now);
        let id = self.alloc(EventSlot::triggered(value));
        self.queue.push(time, id);
        Ok(id)
    }

    /// Trigger a pending event now.  Its waiters fire after every event
    /// already queued for the current time.
    pub fn succeed(&mut self, event: EventId, value: V) -> ScheduleResult<()> {
        let slot = self.events.get_mut(&event).ok_or(ScheduleError::StaleEvent(event))?;
        if slot.value.is_some() {
            return Err(ScheduleError::AlreadyTriggered(event));
        }
        slot.value = Some(value);
        self.queue.push(self.now, event);
        Ok(())
    }

    /// `true` while `event` exists and has not been triggered.
    pub fn is_pending(&self, event: EventId) -> bool {
        self.events.get(&event).is_some_and(|slot| slot.value.is_none())
    }

    /// Composite "first of `a` or `b`".
    pub fn any_of(&mut self, a: EventId, b: EventId) -> ScheduleResult<EventId> {
        if !self.events.contains_key(&a) {
            return Err(ScheduleError::StaleEvent(a));
        }
        if !self.events.contains_key(&b) {
            return Err(ScheduleError::StaleEvent(b));
        }
        let parent = self.new_event();
        for child in [a, b] {
            if let Some(slot) = self.events.get_mut(&child) {
                slot.waiters.push(Waiter::AnyOf(parent));
            }
        }
        Ok(parent)
    }

    /// Drop an event that will never matter again (the losing side of a
    /// composite).  Unknown ids are ignored.
    pub fn discard(&mut self, event: EventId) {
        self.events.remove(&event);
    }

    fn trigger_composite(&mut self, parent: EventId, value: V) {
        if let Some(slot) = self.events.get_mut(&parent) {
            if slot.value.is_none() {
                slot.value = Some(value);
                self.queue.push(self.now, parent);
            }
        }
    }

    // ── Processes ─────────────────────────────────────────────────────────

    /// Register a new process, started at the current time with `initial`.
    pub fn spawn(&mut self, initial: V) -> ProcessId {
        let pid = ProcessId(self.waiting.len() as u32);
        self.waiting.push(None);
        let start = self.alloc(EventSlot::triggered(initial));
        self.queue.push(self.now, start);
        if let Some(slot) = self.events.get_mut(&start) {
            slot.waiters.push(Waiter::Process(pid));
        }
        self.waiting[pid.index()] = Some(start);
        pid
    }

    /// Suspend `process` until `event` is processed.
    pub fn wait(&mut self, process: ProcessId, event: EventId) -> ScheduleResult<()> {
        let current = *self
            .waiting
            .get(process.index())
            .ok_or(ScheduleError::ProcessNotFound(process))?;
        if let Some(other) = current {
            return Err(ScheduleError::AlreadyWaiting(process, other));
        }
        let slot = self.events.get_mut(&event).ok_or(ScheduleError::StaleEvent(event))?;
        slot.waiters.push(Waiter::Process(process));
        self.waiting[process.index()] = Some(event);
        Ok(())
    }

    /// The event `process` is currently suspended on.
    pub fn waiting_on(&self, process: ProcessId) -> Option<EventId> {
        self.waiting.get(process.index()).copied().flatten()
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Process every event due at or before `until`, in time order with
    /// FIFO tie-breaking, then move the clock to `until`.
    ///
    /// Host errors stop the run immediately; the clock stays at the time of
    /// the failing event.
    pub fn run_until<H>(&mut self, until: SimTime, host: &mut H) -> Result<(), H::Error>
    where
        H: ProcessHost<V>,
    {
        while let Some((time, id)) = self.queue.pop_due(until) {
            self.now = time;
            let Some(slot) = self.events.remove(&id) else {
                // discarded after it was queued
                continue;
            };
            let Some(value) = slot.value else {
                continue;
            };
            trace!("processing {id} at {time} ({} waiters)", slot.waiters.len());
            for waiter in slot.waiters {
                match waiter {
                    Waiter::Process(pid) => {
                        if let Some(w) = self.waiting.get_mut(pid.index()) {
                            *w = None;
                        }
                        host.resume(self, pid, value.clone())?;
                    }
                    Waiter::AnyOf(parent) => self.trigger_composite(parent, value.clone()),
                }
            }
        }
        if until > self.now && until.is_finite() {
            self.now = until;
        }
        Ok(())
    }
}
