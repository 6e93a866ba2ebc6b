//! CSV mail-log loader.
//!
//! # CSV format
//!
//! One row per mail item, in any order.  Rows are sorted by `input_time`
//! (ties keep file order) before they are returned.
//!
//! ```csv
//! id,input_id,input_time,destination
//! 0,1,0.0,2
//! 1,1,2.5,1
//! 2,2,2.5,1
//! ```
//!
//! `input_id` and `destination` are station numbers as written on the map.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sc_core::{Mail, MailId, SimTime, StationId};

use crate::ScheduleError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MailLogRecord {
    id:          u64,
    input_id:    u32,
    input_time:  f64,
    destination: u32,
}

/// One logged mail arrival: `mail` appears at input `input` at `time`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct MailArrival {
    pub time:  SimTime,
    pub input: StationId,
    pub mail:  Mail,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a mail log from a CSV file.
pub fn load_mail_log_csv(path: &Path) -> Result<Vec<MailArrival>, ScheduleError> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_mail_log_reader(file)
}

/// Like [`load_mail_log_csv`] but accepts any `Read` source.
pub fn load_mail_log_reader<R: Read>(reader: R) -> Result<Vec<MailArrival>, ScheduleError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut arrivals = Vec::new();

    for result in csv_reader.deserialize::<MailLogRecord>() {
        let row = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        if !row.input_time.is_finite() || row.input_time < 0.0 {
            return Err(ScheduleError::Parse(format!(
                "mail {}: input_time must be a finite non-negative number, got {}",
                row.id, row.input_time
            )));
        }
        arrivals.push(MailArrival {
            time:  SimTime(row.input_time),
            input: StationId(row.input_id),
            mail:  Mail::new(MailId(row.id), StationId(row.destination)),
        });
    }

    // stable: equal times keep file order
    arrivals.sort_by(|a, b| a.time.cmp(&b.time));
    Ok(arrivals)
}
