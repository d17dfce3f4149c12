//! Log sinks
//!
//! A sink receives records that already passed the dispatcher threshold, applies
//! its own threshold and writes them somewhere. Sinks never report failures to
//! their caller; see [`crate::diagnostics`].

mod console;
mod file;
mod lock;
mod view;

pub use console::ConsoleSink;
pub use file::{
    FileSink, FileSinkError, FileSinkOptions, FileState, DEFAULT_FILE_NAME, DEFAULT_MAX_RECORDS,
};
pub use lock::{FileLock, FileLockGuard};
pub use view::{ViewEntry, ViewSink, DEFAULT_VIEW_CAPACITY};

use crate::record::LogRecord;
use crate::severity::Severity;

/// The built-in sink slots, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Console,
    File,
    View,
}

impl SinkKind {
    /// All kinds in the order the dispatcher visits them
    pub const ORDER: [SinkKind; 3] = [SinkKind::Console, SinkKind::File, SinkKind::View];

    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Console => "console",
            SinkKind::File => "file",
            SinkKind::View => "view",
        }
    }
}

/// A destination for formatted records
pub trait Sink: Send + Sync {
    /// Short identifier used in diagnostics
    fn name(&self) -> &'static str;

    fn min_severity(&self) -> Severity;

    fn set_min_severity(&self, severity: Severity);

    /// Format and write the record. Must not panic; failures are reported to the
    /// fallback channel and the record is dropped.
    fn emit(&self, record: &LogRecord);

    /// Emit the record if it clears this sink's threshold
    fn log(&self, record: &LogRecord) {
        if record.severity >= self.min_severity() {
            self.emit(record);
        }
    }
}
