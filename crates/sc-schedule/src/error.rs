use thiserror::Error;

use sc_core::{EventId, ProcessId};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("event {0} was already triggered")]
    AlreadyTriggered(EventId),

    #[error("event {0} is unknown or already processed")]
    StaleEvent(EventId),

    #[error("process {0} is already waiting on event {1}")]
    AlreadyWaiting(ProcessId, EventId),

    #[error("process {0} not found")]
    ProcessNotFound(ProcessId),

    #[error("negative delay {0}")]
    NegativeDelay(f64),

    #[error("mail log parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
