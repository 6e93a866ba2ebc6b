//! `sc-schedule` — discrete-event clock, cooperative process scheduler, and
//! mail-log loading.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`event_queue`] | `EventQueue` (`BTreeMap<SimTime, VecDeque<EventId>>`)   |
//! | [`scheduler`]   | `Scheduler<V>`, `ProcessHost<V>`                        |
//! | [`loader`]      | `MailArrival`, `load_mail_log_csv`, `load_mail_log_reader` |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                    |
//!
//! # Execution model (summary)
//!
//! Processes are plain ids; their state lives in the host.  A process waits
//! on exactly one event at a time.  When the event is processed the
//! scheduler calls [`ProcessHost::resume`] with the event's value, and the
//! host registers the process's next wait before returning.
//!
//! ```text
//! queue:  t=0 [e1, e4]   t=1 [e2]   t=3 [e3]
//!                ^ FIFO among equal times
//! ```

pub mod error;
pub mod event_queue;
pub mod loader;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::EventQueue;
pub use loader::{MailArrival, load_mail_log_csv, load_mail_log_reader};
pub use scheduler::{ProcessHost, Scheduler};
