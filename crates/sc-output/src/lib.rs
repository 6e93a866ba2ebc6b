//! `sc-output` — recording and export of simulation runs.
//!
//! | File            | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | `actions.csv`   | one row per started action: `time,robot,action,row,col,direction,mail,duration` |
//! | `summary.csv`   | `end_time,delivered`, written once when the run ends          |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`RecordingObserver`], which implements `sc_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sc_output::{CsvWriter, RecordingObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = RecordingObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RecordingObserver;
pub use row::{ActionRow, SummaryRow};
pub use writer::OutputWriter;
