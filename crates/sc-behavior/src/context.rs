//! Read-only inputs to a brain decision.

use sc_core::{Direction, Mail, Position, RobotId, RobotType, SimTime};
use sc_spatial::Grid;

/// World snapshot passed to every [`Brain`](crate::Brain) call.
#[derive(Clone, Copy)]
pub struct BrainContext<'a> {
    pub now: SimTime,
    pub grid: &'a Grid,
}

impl<'a> BrainContext<'a> {
    pub fn new(now: SimTime, grid: &'a Grid) -> Self {
        Self { now, grid }
    }
}

/// Snapshot of one robot.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotView {
    pub id: RobotId,
    pub position: Position,
    pub direction: Direction,
    pub mail: Option<Mail>,
    pub kind: RobotType,
    /// The last wait ended by patience timeout or abort, not by success.
    pub timed_out: bool,
}
