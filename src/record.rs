//! Log records and line formatting

use chrono::{DateTime, Local};

use crate::severity::Severity;

/// Separator placed after each leading field of a formatted line
pub const SEPARATOR: &str = " | ";

/// Timestamp format used by file and view lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M %p";

/// Call-site metadata attached to a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Origin {
    /// Source file the record was emitted from
    pub file: String,
    /// Function or module path the record was emitted from
    pub function: String,
    /// Line number within `file`
    pub line: u32,
}

impl Origin {
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }

    /// Origin of the caller of a `#[track_caller]` function
    ///
    /// The function name is not available this way and is left empty.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), String::new(), location.line())
    }
}

/// A single record, built once per admitted call and borrowed by every sink
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub severity: Severity,
    pub message: String,
    pub origin: Origin,
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(severity: Severity, message: impl Into<String>, origin: Origin) -> Self {
        Self {
            severity,
            message: message.into(),
            origin,
            timestamp: Local::now(),
        }
    }

    /// Line written to the log file and the view buffer (no trailing newline)
    ///
    /// Format: `<timestamp> | <message> | <function> | <file> | <line>!`, with the
    /// function and file segments omitted when empty.
    pub fn file_line(&self) -> String {
        let timestamp = self.timestamp.format(TIMESTAMP_FORMAT).to_string();
        self.compose(&timestamp)
    }

    /// Line written to the console (no trailing newline)
    pub fn console_line(&self) -> String {
        let mut text = String::from(self.severity.glyph());
        text.push(' ');
        text.push_str(&self.message);
        text.push_str(SEPARATOR);
        self.push_origin(&mut text);
        text
    }

    fn compose(&self, lead: &str) -> String {
        let mut text = String::with_capacity(lead.len() + self.message.len() + 64);
        text.push_str(lead);
        text.push_str(SEPARATOR);
        text.push_str(&self.message);
        text.push_str(SEPARATOR);
        self.push_origin(&mut text);
        text
    }

    fn push_origin(&self, text: &mut String) {
        for field in [&self.origin.function, &self.origin.file] {
            if !field.is_empty() {
                text.push_str(field);
                text.push_str(SEPARATOR);
            }
        }
        text.push_str(&format!("{}!", self.origin.line));
    }
}
