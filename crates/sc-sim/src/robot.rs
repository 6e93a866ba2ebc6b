//! Robot records and the registry that issues their ids.

use sc_behavior::RobotView;
use sc_core::{Action, Direction, EventId, Mail, Position, ProcessId, RobotId, RobotType, StationId};

use crate::{SimError, SimResult};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// What a robot's process is suspended on.
///
/// Every variant except `Ready` owns the events of its current wait; they
/// are discarded when the wait ends.
#[derive(Clone, Debug, Default)]
pub(crate) enum Phase {
    /// Not waiting; about to ask the brain.
    #[default]
    Ready,
    /// Idle until woken or aborted.
    Idle { abort: EventId, wake: Option<EventId> },
    /// A timed action (turn, take, put) in progress.
    Acting { action: Action, mail: Option<Mail> },
    /// Queued for the lock on `to`.
    WaitingLock { to: Position, grant: EventId, patience: Option<EventId>, abort: EventId, inner: EventId },
    /// Crossing into `to`; the lock on `from` is still held.
    Moving { from: Position, to: Position },
    /// Queued at an input station for mail.
    WaitingMail { input: StationId, ready: EventId, abort: EventId },
}

impl Phase {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Idle { .. } => "idle",
            Phase::Acting { .. } => "acting",
            Phase::WaitingLock { .. } => "waiting for a cell",
            Phase::Moving { .. } => "moving",
            Phase::WaitingMail { .. } => "waiting for mail",
        }
    }

    /// The event `Sim::abort` would fire.
    pub(crate) fn abort_event(&self) -> Option<EventId> {
        match *self {
            Phase::Idle { abort, .. } | Phase::WaitingLock { abort, .. } | Phase::WaitingMail { abort, .. } => {
                Some(abort)
            }
            _ => None,
        }
    }

    /// Every event of the wait, fired or not.
    pub(crate) fn events(&self) -> Vec<EventId> {
        match *self {
            Phase::Idle { abort, wake } => std::iter::once(abort).chain(wake).collect(),
            Phase::WaitingLock { grant, patience, abort, inner, .. } => {
                [grant, abort, inner].into_iter().chain(patience).collect()
            }
            Phase::WaitingMail { ready, abort, .. } => vec![ready, abort],
            _ => Vec::new(),
        }
    }
}

// ── Robot ─────────────────────────────────────────────────────────────────────

/// One robot on the floor.
#[derive(Clone, Debug)]
pub struct Robot {
    pub id: RobotId,
    pub position: Position,
    pub direction: Direction,
    pub mail: Option<Mail>,
    pub kind: RobotType,
    /// Longest wait for a contested cell; `None` waits forever.
    pub patience: Option<f64>,
    /// The last wait ended by patience or abort.  Cleared once the brain
    /// has seen it.
    pub timed_out: bool,
    pub(crate) process: ProcessId,
    pub(crate) phase: Phase,
}

impl Robot {
    pub fn view(&self) -> RobotView {
        RobotView {
            id: self.id,
            position: self.position,
            direction: self.direction,
            mail: self.mail,
            kind: self.kind,
            timed_out: self.timed_out,
        }
    }

    /// Name of the current wait, for logs and errors.
    pub fn phase_name(&self) -> &'static str {
        self.phase.name()
    }
}

// ── RobotStore ────────────────────────────────────────────────────────────────

/// Dense robot registry; ids are issued in insertion order from 0.
#[derive(Default)]
pub struct RobotStore {
    robots: Vec<Robot>,
}

impl RobotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(
        &mut self,
        position: Position,
        direction: Direction,
        kind: RobotType,
        patience: Option<f64>,
        process: ProcessId,
    ) -> RobotId {
        let id = RobotId(self.robots.len() as u32);
        self.robots.push(Robot {
            id,
            position,
            direction,
            mail: None,
            kind,
            patience,
            timed_out: false,
            process,
            phase: Phase::Ready,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn get(&self, id: RobotId) -> SimResult<&Robot> {
        self.robots.get(id.index()).ok_or(SimError::UnknownRobot(id))
    }

    pub(crate) fn get_mut(&mut self, id: RobotId) -> SimResult<&mut Robot> {
        self.robots.get_mut(id.index()).ok_or(SimError::UnknownRobot(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Robot> {
        self.robots.iter()
    }
}
