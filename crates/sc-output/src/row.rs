//! Plain data row types written by output backends.

use sc_sim::ActionRecord;

/// One started action, flattened for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRow {
    pub time:      f64,
    pub robot:     u32,
    /// `idle`, `move`, `take`, `put` or `turn_to_<direction>`.
    pub action:    String,
    pub row:       i32,
    pub col:       i32,
    pub direction: &'static str,
    /// Id of the carried (or taken) mail.
    pub mail:      Option<u64>,
    /// `inf` for an idle with no wake-up time.
    pub duration:  f64,
}

impl From<&ActionRecord> for ActionRow {
    fn from(record: &ActionRecord) -> Self {
        Self {
            time:      record.time.as_f64(),
            robot:     record.robot.0,
            action:    record.action.to_string(),
            row:       record.position.row,
            col:       record.position.col,
            direction: record.direction.as_str(),
            mail:      record.mail.map(|m| m.id.0),
            duration:  record.duration,
        }
    }
}

/// Totals for one finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub end_time:  f64,
    pub delivered: u64,
}
