//! Spatial-subsystem error type.

use thiserror::Error;

use sc_core::{Position, RobotId, SlotId, StationId};

/// Errors produced by `sc-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    ZeroSize { rows: u32, cols: u32 },

    #[error("position {0} is outside the map")]
    PositionOutOfMap(Position),

    #[error("cell {0} is not free")]
    NotFreeCell(Position),

    #[error("station {id} placed on wall at {position}")]
    StationOnWall { id: StationId, position: Position },

    #[error("{kind} station {id} defined twice")]
    DuplicateStation { id: StationId, kind: &'static str },

    #[error("robot {robot} does not hold cell {position}")]
    NotHolder { position: Position, robot: RobotId },

    #[error("slot {0} is not live")]
    DeadSlot(SlotId),

    #[error("sentinel slot {0} cannot be detached")]
    SentinelSlot(SlotId),

    #[error("priority queue is empty")]
    EmptyQueue,

    #[error("item is not in the priority queue")]
    ItemNotQueued,

    #[error("path end was never reached")]
    UnreachablePath,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
