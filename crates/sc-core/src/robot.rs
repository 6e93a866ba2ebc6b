//! Robot-facing value types shared by the brains and the execution loop.

use std::fmt;

use crate::{Direction, MailId, StationId};

// ── Mail ──────────────────────────────────────────────────────────────────────

/// One parcel: created by a mail source, carried by a robot, destroyed on
/// delivery at its destination output station.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mail {
    pub id: MailId,
    pub destination: StationId,
}

impl Mail {
    #[inline]
    pub fn new(id: MailId, destination: StationId) -> Self {
        Self { id, destination }
    }
}

impl fmt::Display for Mail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mail {} -> {}", self.id.0, self.destination.0)
    }
}

// ── RobotType ─────────────────────────────────────────────────────────────────

/// Immutable timing constants of a robot model, in simulated time units.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotType {
    /// Time to move one cell forward.
    pub time_to_move: f64,
    /// Time to turn by 90°.
    pub time_to_turn: f64,
    /// Time to put mail down at an output.
    pub time_to_put: f64,
    /// Time to pick mail up at an input.
    pub time_to_take: f64,
}

impl RobotType {
    pub fn new(time_to_move: f64, time_to_turn: f64, time_to_put: f64, time_to_take: f64) -> Self {
        Self { time_to_move, time_to_turn, time_to_put, time_to_take }
    }

    /// Time to rotate from `from` to `to` by the shortest way.
    #[inline]
    pub fn turn_time(&self, from: Direction, to: Direction) -> f64 {
        self.time_to_turn * from.turn_count(to) as f64
    }
}

impl Default for RobotType {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

/// What a brain can ask a robot to do next.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Stay put until woken.
    Idle,
    /// Step one cell forward.
    Move,
    /// Rotate to face the given direction.
    Turn(Direction),
    /// Pick mail up at the current input station.
    Take,
    /// Put the carried mail down at the current output station.
    Put,
}

impl Action {
    /// Duration of the action for a robot of `kind` currently facing
    /// `facing`.  `Idle` has no intrinsic duration.
    pub fn duration(self, kind: &RobotType, facing: Direction) -> f64 {
        match self {
            Action::Idle => 0.0,
            Action::Move => kind.time_to_move,
            Action::Turn(to) => kind.turn_time(facing, to),
            Action::Take => kind.time_to_take,
            Action::Put => kind.time_to_put,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Move => "move",
            Action::Turn(_) => "turn",
            Action::Take => "take",
            Action::Put => "put",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Turn(dir) => write!(f, "turn_to_{dir}"),
            other => f.write_str(other.as_str()),
        }
    }
}
