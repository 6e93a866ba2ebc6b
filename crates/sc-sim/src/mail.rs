//! Mail sources and the per-input mail desk.
//!
//! A [`MailSource`] produces mail in one of two ways:
//!
//! - on demand: [`MailSource::request`] hands a mail to a robot standing at
//!   an input the moment it asks;
//! - on a timetable: [`MailSource::next_release`] / [`MailSource::release`]
//!   drop mail at inputs at fixed times.
//!
//! The [`MailDesk`] sits between sources and robots.  It stocks released
//! mail per input and keeps robots that asked for mail at an empty input in
//! a FIFO queue until something arrives.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use sc_core::{EventId, Mail, MailId, RobotId, SimRng, SimTime, StationId};
use sc_schedule::{MailArrival, load_mail_log_csv};

use crate::{SimError, SimResult};

// ── MailSource ────────────────────────────────────────────────────────────────

pub trait MailSource {
    /// Mail available at `input` right now without waiting.
    fn request(&mut self, input: StationId, now: SimTime) -> Option<Mail>;

    /// Time of the next timed arrival, if the source has any.
    fn next_release(&self) -> Option<SimTime> {
        None
    }

    /// Every timed arrival due at or before `now`, in arrival order.
    fn release(&mut self, _now: SimTime) -> Vec<(StationId, Mail)> {
        Vec::new()
    }
}

/// Every input always has mail; destinations are drawn uniformly from a
/// fixed list.
pub struct AlwaysReadyMail {
    destinations: Vec<StationId>,
    rng: SimRng,
    next_id: u64,
}

impl AlwaysReadyMail {
    pub fn new(destinations: Vec<StationId>, rng: SimRng) -> Self {
        Self { destinations, rng, next_id: 0 }
    }
}

impl MailSource for AlwaysReadyMail {
    fn request(&mut self, _input: StationId, _now: SimTime) -> Option<Mail> {
        let destination = *self.rng.choose(&self.destinations)?;
        let mail = Mail::new(MailId(self.next_id), destination);
        self.next_id += 1;
        Some(mail)
    }
}

/// Each input hands out mail for a fixed sequence of destinations, then
/// runs dry.
pub struct SequenceMail {
    sequences: HashMap<StationId, VecDeque<StationId>>,
    next_id: u64,
}

impl SequenceMail {
    pub fn new(sequences: impl IntoIterator<Item = (StationId, Vec<StationId>)>) -> Self {
        let sequences = sequences.into_iter().map(|(input, seq)| (input, seq.into())).collect();
        Self { sequences, next_id: 0 }
    }

    /// Destinations still queued at `input`.
    pub fn remaining(&self, input: StationId) -> usize {
        self.sequences.get(&input).map_or(0, VecDeque::len)
    }
}

impl MailSource for SequenceMail {
    fn request(&mut self, input: StationId, _now: SimTime) -> Option<Mail> {
        let destination = self.sequences.get_mut(&input)?.pop_front()?;
        let mail = Mail::new(MailId(self.next_id), destination);
        self.next_id += 1;
        Some(mail)
    }
}

/// One mail every `interval`, dropped at a random input with a random
/// destination.  The first one arrives after one interval.
pub struct RandomMail {
    interval: f64,
    inputs: Vec<StationId>,
    destinations: Vec<StationId>,
    rng: SimRng,
    next_at: SimTime,
    next_id: u64,
}

impl RandomMail {
    pub fn new(interval: f64, inputs: Vec<StationId>, destinations: Vec<StationId>, rng: SimRng) -> SimResult<Self> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(SimError::Config(format!("mail interval must be positive, got {interval}")));
        }
        if inputs.is_empty() || destinations.is_empty() {
            return Err(SimError::Config("random mail needs at least one input and one destination".into()));
        }
        Ok(Self { interval, inputs, destinations, rng, next_at: SimTime(interval), next_id: 0 })
    }
}

impl MailSource for RandomMail {
    fn request(&mut self, _input: StationId, _now: SimTime) -> Option<Mail> {
        None
    }

    fn next_release(&self) -> Option<SimTime> {
        Some(self.next_at)
    }

    fn release(&mut self, now: SimTime) -> Vec<(StationId, Mail)> {
        let mut due = Vec::new();
        while self.next_at <= now {
            let (Some(&input), Some(&destination)) = (self.rng.choose(&self.inputs), self.rng.choose(&self.destinations))
            else {
                break;
            };
            due.push((input, Mail::new(MailId(self.next_id), destination)));
            self.next_id += 1;
            self.next_at = self.next_at + self.interval;
        }
        due
    }
}

/// Replays a mail log: each mail appears at its input at its logged time.
pub struct LoggedMail {
    arrivals: VecDeque<MailArrival>,
}

impl LoggedMail {
    pub fn new(mut arrivals: Vec<MailArrival>) -> Self {
        arrivals.sort_by(|a, b| a.time.cmp(&b.time));
        Self { arrivals: arrivals.into() }
    }

    /// Load the log with [`load_mail_log_csv`].
    pub fn from_csv(path: &Path) -> SimResult<Self> {
        Ok(Self::new(load_mail_log_csv(path)?))
    }

    pub fn pending(&self) -> usize {
        self.arrivals.len()
    }
}

impl MailSource for LoggedMail {
    fn request(&mut self, _input: StationId, _now: SimTime) -> Option<Mail> {
        None
    }

    fn next_release(&self) -> Option<SimTime> {
        self.arrivals.front().map(|a| a.time)
    }

    fn release(&mut self, now: SimTime) -> Vec<(StationId, Mail)> {
        let mut due = Vec::new();
        while let Some(arrival) = self.arrivals.front() {
            if arrival.time > now {
                break;
            }
            due.push((arrival.input, arrival.mail));
            self.arrivals.pop_front();
        }
        due
    }
}

// ── MailDesk ──────────────────────────────────────────────────────────────────

pub struct MailDesk<M> {
    source: M,
    stock: HashMap<StationId, VecDeque<Mail>>,
    takers: HashMap<StationId, VecDeque<(RobotId, EventId)>>,
    /// Released to a robot that has not picked it up yet.
    handed: HashMap<RobotId, Mail>,
}

impl<M: MailSource> MailDesk<M> {
    pub fn new(source: M) -> Self {
        Self { source, stock: HashMap::new(), takers: HashMap::new(), handed: HashMap::new() }
    }

    pub fn source(&self) -> &M {
        &self.source
    }

    /// Stocked mail first, then whatever the source hands out on demand.
    pub fn request(&mut self, input: StationId, now: SimTime) -> Option<Mail> {
        if let Some(mail) = self.stock.get_mut(&input).and_then(VecDeque::pop_front) {
            return Some(mail);
        }
        self.source.request(input, now)
    }

    /// Queue `robot` at `input`; `ready` is triggered when mail is handed to
    /// it.
    pub fn wait(&mut self, input: StationId, robot: RobotId, ready: EventId) {
        self.takers.entry(input).or_default().push_back((robot, ready));
    }

    /// Remove `robot` from the queue at `input`.  `false` if it was not
    /// queued.
    pub fn withdraw(&mut self, input: StationId, robot: RobotId) -> bool {
        let Some(queue) = self.takers.get_mut(&input) else {
            return false;
        };
        let before = queue.len();
        queue.retain(|&(r, _)| r != robot);
        queue.len() != before
    }

    /// Claim the mail released to `robot`, if any.
    pub fn collect(&mut self, robot: RobotId) -> Option<Mail> {
        self.handed.remove(&robot)
    }

    pub fn next_release(&self) -> Option<SimTime> {
        self.source.next_release()
    }

    /// Pull due arrivals from the source.  Mail goes to the longest-waiting
    /// robot at its input; the rest is stocked.  Returns the events to
    /// trigger.
    pub fn release(&mut self, now: SimTime) -> Vec<(EventId, Mail)> {
        let mut handed = Vec::new();
        for (input, mail) in self.source.release(now) {
            match self.takers.get_mut(&input).and_then(VecDeque::pop_front) {
                Some((robot, ready)) => {
                    self.handed.insert(robot, mail);
                    handed.push((ready, mail));
                }
                None => self.stock.entry(input).or_default().push_back(mail),
            }
        }
        handed
    }

    pub fn waiting(&self, input: StationId) -> usize {
        self.takers.get(&input).map_or(0, VecDeque::len)
    }

    pub fn stocked(&self, input: StationId) -> usize {
        self.stock.get(&input).map_or(0, VecDeque::len)
    }
}
