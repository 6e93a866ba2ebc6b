//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `actions.csv`
//! - `summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ActionRow, OutputResult, SummaryRow};

/// Writes recorded actions and the run summary to two CSV files.
pub struct CsvWriter {
    actions:  Writer<File>,
    summary:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut actions = Writer::from_path(dir.join("actions.csv"))?;
        actions.write_record(["time", "robot", "action", "row", "col", "direction", "mail", "duration"])?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(["end_time", "delivered"])?;

        Ok(Self { actions, summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_action(&mut self, row: &ActionRow) -> OutputResult<()> {
        self.actions.write_record(&[
            row.time.to_string(),
            row.robot.to_string(),
            row.action.clone(),
            row.row.to_string(),
            row.col.to_string(),
            row.direction.to_owned(),
            row.mail.map(|m| m.to_string()).unwrap_or_default(),
            row.duration.to_string(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[row.end_time.to_string(), row.delivered.to_string()])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.actions.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
