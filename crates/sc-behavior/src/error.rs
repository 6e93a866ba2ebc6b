use thiserror::Error;

use sc_core::{MailId, Position, RobotId, SimTime, StationId};
use sc_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("robot {robot}: no feasible path from {from} to {to}")]
    UnreachablePath { robot: RobotId, from: Position, to: Position },

    #[error("robot {robot}: path start does not match its slot at {position} ({at})")]
    InvalidPathStart { robot: RobotId, position: Position, at: SimTime },

    #[error("robot {0} was never registered with the brain")]
    UnknownRobot(RobotId),

    #[error("robot {robot}: mail {mail} is addressed to unknown output {station}")]
    UnknownOutput { robot: RobotId, mail: MailId, station: StationId },

    #[error("map has no input stations")]
    NoInputStations,

    #[error("brain configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type BrainResult<T> = Result<T, BrainError>;
