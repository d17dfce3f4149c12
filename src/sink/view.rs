//! In-memory view sink
//!
//! Keeps the most recent formatted lines for an on-screen overlay. Rendering is
//! left to the consumer, which polls the buffer.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Local};

use super::Sink;
use crate::record::LogRecord;
use crate::severity::{Severity, SeverityCell};

/// Default number of lines kept for display
pub const DEFAULT_VIEW_CAPACITY: usize = 255;

/// A formatted line held by the view buffer
#[derive(Debug, Clone)]
pub struct ViewEntry {
    /// Timestamp of the originating record
    pub timestamp: DateTime<Local>,
    /// Severity of the originating record
    pub severity: Severity,
    /// Line as it would appear in the log file
    pub line: String,
}

/// Thread-safe ring buffer sink
pub struct ViewSink {
    min_severity: SeverityCell,
    /// All entries (capped at max_entries)
    entries: RwLock<VecDeque<ViewEntry>>,
    max_entries: usize,
}

impl ViewSink {
    /// Create a view sink keeping at most `max_entries` lines
    pub fn new(max_entries: usize) -> Self {
        Self {
            min_severity: SeverityCell::default(),
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            max_entries,
        }
    }

    fn push(&self, entry: ViewEntry) {
        if self.max_entries == 0 {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            if entries.len() >= self.max_entries {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    /// All entries, oldest first
    pub fn all_entries(&self) -> Vec<ViewEntry> {
        self.entries
            .read()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Only the formatted lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|e| e.iter().map(|entry| entry.line.clone()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every buffered line, e.g. when the overlay is dismissed
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl Default for ViewSink {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_CAPACITY)
    }
}

impl Sink for ViewSink {
    fn name(&self) -> &'static str {
        "view"
    }

    fn min_severity(&self) -> Severity {
        self.min_severity.get()
    }

    fn set_min_severity(&self, severity: Severity) {
        self.min_severity.set(severity);
    }

    fn emit(&self, record: &LogRecord) {
        self.push(ViewEntry {
            timestamp: record.timestamp,
            severity: record.severity,
            line: record.file_line(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Origin;

    fn record(severity: Severity, message: &str) -> LogRecord {
        LogRecord::new(severity, message, Origin::new("view.rs", "", 1))
    }

    #[test]
    fn test_view_push_and_retrieve() {
        let sink = ViewSink::new(100);

        sink.emit(&record(Severity::Info, "message 1"));
        sink.emit(&record(Severity::Warning, "warning 1"));
        sink.emit(&record(Severity::Error, "error 1"));

        assert_eq!(sink.len(), 3);

        let lines = sink.lines();
        assert!(lines[0].contains("message 1"));
        assert!(lines[2].ends_with("view.rs | 1!"));

        let entries = sink.all_entries();
        assert_eq!(entries[1].severity, Severity::Warning);
        assert_eq!(entries[2].severity, Severity::Error);
    }

    #[test]
    fn test_view_capacity() {
        let sink = ViewSink::new(3);

        for i in 0..5 {
            sink.emit(&record(Severity::Info, &format!("msg {}", i)));
        }

        assert_eq!(sink.len(), 3);
        let lines = sink.lines();
        assert!(lines[0].contains("msg 2"));
        assert!(lines[2].contains("msg 4"));
    }

    #[test]
    fn test_view_zero_capacity_keeps_nothing() {
        let sink = ViewSink::new(0);
        sink.emit(&record(Severity::Error, "boom"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_view_clear() {
        let sink = ViewSink::default();
        sink.emit(&record(Severity::Error, "boom"));
        assert_eq!(sink.len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_view_log_respects_min_severity() {
        let sink = ViewSink::default();
        sink.set_min_severity(Severity::Error);
        sink.log(&record(Severity::Warning, "skipped"));
        assert!(sink.is_empty());
    }
}
