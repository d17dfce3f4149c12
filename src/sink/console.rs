//! Console sink writing to the standard error stream

use std::io::{self, Write};
use std::sync::Mutex;

use super::Sink;
use crate::record::LogRecord;
use crate::severity::{Severity, SeverityCell};

/// Writes glyph-prefixed lines to stderr (or an injected writer)
pub struct ConsoleSink {
    min_severity: SeverityCell,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink on the process's stderr
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Console sink on an arbitrary writer
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            min_severity: SeverityCell::default(),
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    fn min_severity(&self) -> Severity {
        self.min_severity.get()
    }

    fn set_min_severity(&self, severity: Severity) {
        self.min_severity.set(severity);
    }

    fn emit(&self, record: &LogRecord) {
        let mut line = record.console_line();
        line.push('\n');
        // The console is treated as always available; a writer that panicked
        // mid-line is still usable for the next one
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}
