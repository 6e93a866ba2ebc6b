use sc_behavior::BrainError;
use sc_core::{Mail, Position, RobotId, ScError};
use sc_schedule::ScheduleError;
use sc_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("robot {0} not found")]
    UnknownRobot(RobotId),

    #[error("robot {robot} tried to take mail while carrying {mail}")]
    DoubleTake { robot: RobotId, mail: Mail },

    #[error("robot {robot} at {position} is not on an input station")]
    NotInput { robot: RobotId, position: Position },

    #[error("robot {0} has no mail to put")]
    NothingToPut(RobotId),

    #[error("robot {robot} tried to put {mail} at {position}, which is not its output")]
    IncorrectOutput { robot: RobotId, mail: Mail, position: Position },

    #[error("robot {robot} cannot move from {from} into {to}")]
    Blocked { robot: RobotId, from: Position, to: Position },

    #[error("robot {robot} got {signal} while {phase}")]
    UnexpectedSignal { robot: RobotId, signal: &'static str, phase: &'static str },

    #[error(transparent)]
    Core(#[from] ScError),

    #[error(transparent)]
    Brain(#[from] BrainError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
