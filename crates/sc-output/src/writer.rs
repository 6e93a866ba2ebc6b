//! The `OutputWriter` trait implemented by export backends.

use crate::{ActionRow, OutputResult, SummaryRow};

/// A sink for recorded actions.
///
/// The observer never sees these errors directly; they are kept and handed
/// out by [`RecordingObserver::take_error`](crate::RecordingObserver::take_error).
pub trait OutputWriter {
    /// Write one started action.
    fn write_action(&mut self, row: &ActionRow) -> OutputResult<()>;

    /// Write the end-of-run summary.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
