//! The `Sim` struct and the robot execution loop.
//!
//! # Robot process
//!
//! Each robot is one scheduler process.  Whenever it is resumed it either
//! finishes what it was doing or asks the brain for a new decision and
//! suspends again:
//!
//! ```text
//! Ready ─► brain.next_action ─┬─ Idle ──────► wait(abort | wake) ───────────┐
//!   ▲                         ├─ Turn / Put ─► wait(elapsed) ───────────────┤
//!   │                         ├─ Take ─► [wait(abort | mail)] ─► wait(elapsed)
//!   │                         └─ Move ─► [wait(abort | grant | patience)]   │
//!   │                                        ─► wait(elapsed), release old  │
//!   └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Moves lock the target cell with [`CellLocks`]; a robot that finds it held
//! queues FIFO behind the holder.  A wait that ends by patience or abort
//! sets `timed_out` for the next decision.

use sc_behavior::{Brain, BrainContext};
use sc_core::{Action, Mail, Position, ProcessId, RobotId, SimConfig, SimTime};
use sc_schedule::{ProcessHost, Scheduler};
use sc_spatial::{CellLocks, Grid, LockOutcome};
use tracing::{debug, info, trace, warn};

use crate::robot::Phase;
use crate::{ActionRecord, MailDesk, MailSource, Robot, RobotStore, SimError, SimObserver, SimResult, Throughput};

// ── Signals and process owners ────────────────────────────────────────────────

/// Value carried by every scheduler event of the simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Signal {
    Start,
    Elapsed,
    Aborted,
    Granted,
    Mail(Mail),
}

impl Signal {
    fn name(self) -> &'static str {
        match self {
            Signal::Start => "start",
            Signal::Elapsed => "elapsed",
            Signal::Aborted => "aborted",
            Signal::Granted => "granted",
            Signal::Mail(_) => "mail",
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum Owner {
    Robot(RobotId),
    MailFeed,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.  Create via [`SimBuilder`](crate::SimBuilder).
pub struct Sim<B, M> {
    pub config: SimConfig,
    pub(crate) sched: Scheduler<Signal>,
    pub(crate) floor: Floor<B, M>,
}

/// Everything a process may touch while the scheduler is running.
pub(crate) struct Floor<B, M> {
    pub(crate) grid: Grid,
    pub(crate) robots: RobotStore,
    pub(crate) brain: B,
    pub(crate) desk: MailDesk<M>,
    pub(crate) locks: CellLocks,
    /// Indexed by `ProcessId`.
    pub(crate) owners: Vec<Owner>,
    pub(crate) delivered: u64,
}

impl<B: Brain, M: MailSource> Sim<B, M> {
    #[inline]
    pub fn now(&self) -> SimTime {
        self.sched.now()
    }

    pub fn grid(&self) -> &Grid {
        &self.floor.grid
    }

    pub fn robots(&self) -> &RobotStore {
        &self.floor.robots
    }

    pub fn robot(&self, id: RobotId) -> SimResult<&Robot> {
        self.floor.robots.get(id)
    }

    pub fn brain(&self) -> &B {
        &self.floor.brain
    }

    pub fn desk(&self) -> &MailDesk<M> {
        &self.floor.desk
    }

    pub fn locks(&self) -> &CellLocks {
        &self.floor.locks
    }

    /// Mail put at the correct output so far.
    pub fn delivered(&self) -> u64 {
        self.floor.delivered
    }

    /// Process every event up to and including `until`, then leave the
    /// clock at `until`.
    pub fn run_until<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<()> {
        let mut host = Host { floor: &mut self.floor, observer };
        self.sched.run_until(until, &mut host)
    }

    /// Run to `config.end_time` and notify the observer.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!("running {} robots until {}", self.floor.robots.len(), self.config.end_time);
        self.run_until(self.config.end_time, observer)?;
        observer.on_sim_end(self.now(), self.floor.delivered);
        info!("stopped at {} with {} deliveries", self.now(), self.floor.delivered);
        Ok(())
    }

    /// Cut short whatever `robot` is waiting on (idle, a contested cell, or
    /// mail).  `false`, with a warning, if it is not in an abortable wait.
    pub fn abort(&mut self, robot: RobotId) -> SimResult<bool> {
        let r = self.floor.robots.get(robot)?;
        match r.phase.abort_event() {
            Some(event) if self.sched.is_pending(event) => {
                self.sched.succeed(event, Signal::Aborted)?;
                info!("robot {robot}: {} aborted", r.phase.name());
                Ok(true)
            }
            _ => {
                warn!("tried to abort robot {robot}, but its wait already ended ({})", r.phase.name());
                Ok(false)
            }
        }
    }

    /// Run `count` consecutive windows of length `window` and summarise the
    /// deliveries per window.
    pub fn throughput<O: SimObserver>(&mut self, window: f64, count: usize, observer: &mut O) -> SimResult<Throughput> {
        if !(window.is_finite() && window > 0.0) {
            return Err(SimError::Config(format!("throughput window must be positive, got {window}")));
        }
        if count < 2 {
            return Err(SimError::Config(format!("throughput needs at least two windows, got {count}")));
        }
        let mut counts = Vec::with_capacity(count);
        for _ in 0..count {
            let before = self.floor.delivered;
            let until = self.now() + window;
            self.run_until(until, observer)?;
            counts.push(self.floor.delivered - before);
        }
        let stats = Throughput::from_counts(counts);
        debug!("throughput over {count} windows of {window}: {:.3} ± {:.3}", stats.mean, stats.std_dev);
        Ok(stats)
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

struct Host<'a, B, M, O> {
    floor: &'a mut Floor<B, M>,
    observer: &'a mut O,
}

impl<B: Brain, M: MailSource, O: SimObserver> ProcessHost<Signal> for Host<'_, B, M, O> {
    type Error = SimError;

    fn resume(&mut self, sched: &mut Scheduler<Signal>, process: ProcessId, signal: Signal) -> SimResult<()> {
        match self.floor.owners.get(process.index()).copied() {
            Some(Owner::Robot(id)) => self.step(sched, id, signal),
            Some(Owner::MailFeed) => self.feed(sched, process),
            None => Err(SimError::Config(format!("process {process} has no owner"))),
        }
    }
}

impl<B: Brain, M: MailSource, O: SimObserver> Host<'_, B, M, O> {
    /// Hand out due timed mail, then sleep until the next arrival.
    fn feed(&mut self, sched: &mut Scheduler<Signal>, process: ProcessId) -> SimResult<()> {
        for (ready, mail) in self.floor.desk.release(sched.now()) {
            sched.succeed(ready, Signal::Mail(mail))?;
        }
        if let Some(next) = self.floor.desk.next_release() {
            let tick = sched.schedule_at(next, Signal::Elapsed)?;
            sched.wait(process, tick)?;
        }
        Ok(())
    }

    fn step(&mut self, sched: &mut Scheduler<Signal>, id: RobotId, signal: Signal) -> SimResult<()> {
        let robot = self.floor.robots.get_mut(id)?;
        let phase = std::mem::take(&mut robot.phase);

        for event in phase.events() {
            sched.discard(event);
        }
        // mail handed over in the same instant as the abort: take it anyway
        if let (Phase::WaitingMail { input, .. }, Signal::Aborted) = (&phase, signal) {
            if !self.floor.desk.withdraw(*input, id) {
                if let Some(mail) = self.floor.desk.collect(id) {
                    return self.start_take(sched, id, mail);
                }
            }
        }

        match (phase, signal) {
            (Phase::Ready, Signal::Start) | (Phase::Idle { .. }, Signal::Elapsed) => self.decide(sched, id),
            (Phase::Idle { .. }, Signal::Aborted) => {
                robot.timed_out = true;
                self.decide(sched, id)
            }
            (Phase::Acting { action, mail }, Signal::Elapsed) => {
                self.finish(sched.now(), id, action, mail)?;
                self.decide(sched, id)
            }
            (Phase::WaitingLock { to, .. }, Signal::Granted) => self.start_move(sched, id, to),
            (Phase::WaitingLock { to, .. }, Signal::Elapsed | Signal::Aborted) => {
                if self.floor.locks.holder(&self.floor.grid, to) == Some(id) {
                    // granted in the same instant
                    return self.start_move(sched, id, to);
                }
                self.floor.locks.withdraw(&self.floor.grid, to, id);
                robot.timed_out = true;
                debug!("t={} robot {id} gave up waiting for {to} ({})", sched.now(), signal.name());
                self.decide(sched, id)
            }
            (Phase::Moving { from, to }, Signal::Elapsed) => {
                robot.position = to;
                if let Some(next) = self.floor.locks.release(&self.floor.grid, from, id)? {
                    self.grant(sched, next)?;
                }
                self.decide(sched, id)
            }
            (Phase::WaitingMail { .. }, Signal::Mail(mail)) => {
                self.floor.desk.collect(id);
                self.start_take(sched, id, mail)
            }
            (Phase::WaitingMail { .. }, Signal::Aborted) => {
                robot.timed_out = true;
                self.decide(sched, id)
            }
            (phase, signal) => {
                Err(SimError::UnexpectedSignal { robot: id, signal: signal.name(), phase: phase.name() })
            }
        }
    }

    // ── Decisions ─────────────────────────────────────────────────────────

    fn decide(&mut self, sched: &mut Scheduler<Signal>, id: RobotId) -> SimResult<()> {
        let now = sched.now();
        let floor = &mut *self.floor;
        let robot = floor.robots.get_mut(id)?;
        let view = robot.view();
        robot.timed_out = false;
        let decision = floor.brain.next_action(&view, &BrainContext::new(now, &floor.grid))?;
        trace!("t={now} robot {id} at {}: {}", view.position, decision.action);
        match decision.action {
            Action::Idle => self.idle(sched, id, decision.wake_at),
            Action::Move => self.request_move(sched, id),
            Action::Take => self.request_mail(sched, id),
            action @ (Action::Turn(_) | Action::Put) => self.start_timed(sched, id, action, None),
        }
    }

    fn idle(&mut self, sched: &mut Scheduler<Signal>, id: RobotId, wake_at: Option<SimTime>) -> SimResult<()> {
        let now = sched.now();
        let abort = sched.new_event();
        let (wait, wake) = match wake_at {
            Some(time) => {
                let wake = sched.schedule_at(time, Signal::Elapsed)?;
                (sched.any_of(abort, wake)?, Some(wake))
            }
            None => (abort, None),
        };
        let duration = wake_at.map_or(f64::INFINITY, |t| t.max(now) - now);
        self.record(now, id, Action::Idle, None, duration)?;
        let robot = self.floor.robots.get_mut(id)?;
        robot.phase = Phase::Idle { abort, wake };
        sched.wait(robot.process, wait)?;
        Ok(())
    }

    fn request_move(&mut self, sched: &mut Scheduler<Signal>, id: RobotId) -> SimResult<()> {
        let floor = &mut *self.floor;
        let robot = floor.robots.get_mut(id)?;
        let from = robot.position;
        let to = from.next_on(robot.direction);
        if !floor.grid.can_traverse(from, robot.direction) {
            return Err(SimError::Blocked { robot: id, from, to });
        }
        match floor.locks.try_lock(&floor.grid, to, id)? {
            LockOutcome::Acquired => self.start_move(sched, id, to),
            LockOutcome::Held(holder) => {
                floor.locks.enqueue(&floor.grid, to, id)?;
                let grant = sched.new_event();
                let abort = sched.new_event();
                let patience = match robot.patience {
                    Some(limit) => Some(sched.schedule_timeout(limit, Signal::Elapsed)?),
                    None => None,
                };
                let inner = match patience {
                    Some(timeout) => sched.any_of(grant, timeout)?,
                    None => grant,
                };
                let wait = sched.any_of(abort, inner)?;
                debug!("t={} robot {id} waits for {to}, held by robot {holder}", sched.now());
                robot.phase = Phase::WaitingLock { to, grant, patience, abort, inner };
                sched.wait(robot.process, wait)?;
                Ok(())
            }
        }
    }

    fn request_mail(&mut self, sched: &mut Scheduler<Signal>, id: RobotId) -> SimResult<()> {
        let floor = &mut *self.floor;
        let robot = floor.robots.get_mut(id)?;
        if let Some(mail) = robot.mail {
            return Err(SimError::DoubleTake { robot: id, mail });
        }
        let position = robot.position;
        let input = floor.grid.input_at(position).ok_or(SimError::NotInput { robot: id, position })?;
        match floor.desk.request(input, sched.now()) {
            Some(mail) => self.start_take(sched, id, mail),
            None => {
                let ready = sched.new_event();
                let abort = sched.new_event();
                floor.desk.wait(input, id, ready);
                let wait = sched.any_of(abort, ready)?;
                debug!("t={} robot {id} waits for mail at input {input}", sched.now());
                robot.phase = Phase::WaitingMail { input, ready, abort };
                sched.wait(robot.process, wait)?;
                Ok(())
            }
        }
    }

    // ── Timed actions ─────────────────────────────────────────────────────

    fn start_move(&mut self, sched: &mut Scheduler<Signal>, id: RobotId, to: Position) -> SimResult<()> {
        let robot = self.floor.robots.get(id)?;
        let (from, duration) = (robot.position, Action::Move.duration(&robot.kind, robot.direction));
        self.record(sched.now(), id, Action::Move, None, duration)?;
        let done = sched.schedule_timeout(duration, Signal::Elapsed)?;
        let robot = self.floor.robots.get_mut(id)?;
        robot.phase = Phase::Moving { from, to };
        sched.wait(robot.process, done)?;
        Ok(())
    }

    fn start_take(&mut self, sched: &mut Scheduler<Signal>, id: RobotId, mail: Mail) -> SimResult<()> {
        self.start_timed(sched, id, Action::Take, Some(mail))
    }

    /// Turn, take or put: check preconditions, record, and wait out the
    /// duration.
    fn start_timed(
        &mut self,
        sched: &mut Scheduler<Signal>,
        id: RobotId,
        action: Action,
        taken: Option<Mail>,
    ) -> SimResult<()> {
        let robot = self.floor.robots.get(id)?;
        if action == Action::Put {
            let mail = robot.mail.ok_or(SimError::NothingToPut(id))?;
            if self.floor.grid.output_at(robot.position) != Some(mail.destination) {
                return Err(SimError::IncorrectOutput { robot: id, mail, position: robot.position });
            }
        }
        let duration = action.duration(&robot.kind, robot.direction);
        self.record(sched.now(), id, action, taken, duration)?;
        let done = sched.schedule_timeout(duration, Signal::Elapsed)?;
        let robot = self.floor.robots.get_mut(id)?;
        robot.phase = Phase::Acting { action, mail: taken };
        sched.wait(robot.process, done)?;
        Ok(())
    }

    /// Apply the effect of a completed turn, take or put.
    fn finish(&mut self, now: SimTime, id: RobotId, action: Action, taken: Option<Mail>) -> SimResult<()> {
        let robot = self.floor.robots.get_mut(id)?;
        match action {
            Action::Turn(direction) => robot.direction = direction,
            Action::Take => robot.mail = taken,
            Action::Put => {
                let mail = robot.mail.take().ok_or(SimError::NothingToPut(id))?;
                self.floor.delivered += 1;
                debug!("t={now} robot {id} delivered {mail}");
                self.observer.on_delivered(now, id, mail);
            }
            Action::Idle | Action::Move => {}
        }
        Ok(())
    }

    /// `waiter` is now the holder of the cell it queued for.
    fn grant(&mut self, sched: &mut Scheduler<Signal>, waiter: RobotId) -> SimResult<()> {
        let robot = self.floor.robots.get(waiter)?;
        match robot.phase {
            Phase::WaitingLock { grant, .. } => Ok(sched.succeed(grant, Signal::Granted)?),
            ref phase => Err(SimError::UnexpectedSignal { robot: waiter, signal: "granted", phase: phase.name() }),
        }
    }

    fn record(&mut self, now: SimTime, id: RobotId, action: Action, taken: Option<Mail>, duration: f64) -> SimResult<()> {
        let robot = self.floor.robots.get(id)?;
        self.observer.on_action(&ActionRecord {
            time: now,
            robot: id,
            action,
            position: robot.position,
            direction: robot.direction,
            mail: taken.or(robot.mail),
            duration,
        });
        Ok(())
    }
}
