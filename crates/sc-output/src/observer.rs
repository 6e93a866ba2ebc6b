//! `RecordingObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use sc_core::SimTime;
use sc_sim::{ActionRecord, SimObserver};

use crate::row::{ActionRow, SummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every started action and the final summary
/// to any [`OutputWriter`].
///
/// `SimObserver` methods return nothing, so write errors are stored. After
/// `sim.run()` returns, check them with [`take_error`][Self::take_error].
/// Once a write fails, later actions are not written.
pub struct RecordingObserver<W: OutputWriter> {
    writer:     W,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> RecordingObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0, last_error: None }
    }

    /// Action rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer outside of `on_sim_end`, e.g. after `run_until`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for RecordingObserver<W> {
    fn on_action(&mut self, record: &ActionRecord) {
        if self.last_error.is_some() {
            return;
        }
        let result = self.writer.write_action(&ActionRow::from(record));
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_sim_end(&mut self, time: SimTime, delivered: u64) {
        let summary = SummaryRow { end_time: time.as_f64(), delivered };
        let result = self.writer.write_summary(&summary).and_then(|()| self.writer.finish());
        self.store_err(result);
    }
}
