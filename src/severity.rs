//! Severity levels and their ordering
//!
//! Levels are ordered by rank (debug=0 .. error=3) and round-trip through the
//! lowercase identifiers used in configuration files.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Information normally of use only when debugging
    Debug,
    /// Informational messages
    Info,
    /// Not an error condition, but worth attention
    #[serde(alias = "warn")]
    Warning,
    /// Error conditions
    Error,
}

impl Severity {
    /// All severities, lowest rank first
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Ordinal rank used for comparisons
    pub fn rank(self) -> u8 {
        match self {
            Severity::Debug => 0,
            Severity::Info => 1,
            Severity::Warning => 2,
            Severity::Error => 3,
        }
    }

    /// Inverse of [`Severity::rank`]
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.rank() == rank)
    }

    /// Stable identifier used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Prefix glyph shown on console lines
    pub fn glyph(&self) -> &'static str {
        match self {
            Severity::Debug => "\u{1F539}",
            Severity::Info => "\u{1F538}",
            Severity::Warning => "\u{26A0}\u{FE0F}",
            Severity::Error => "\u{1F6AB}",
        }
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown severity identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity '{0}' (expected debug, info, warning or error)")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Atomically mutable severity threshold
///
/// Readers and writers are not coordinated beyond the atomic itself; a racing
/// update only shifts which records pass the filter for a short window.
#[derive(Debug)]
pub struct SeverityCell(AtomicU8);

impl SeverityCell {
    pub fn new(severity: Severity) -> Self {
        Self(AtomicU8::new(severity.rank()))
    }

    pub fn get(&self) -> Severity {
        Severity::from_rank(self.0.load(AtomicOrdering::Relaxed)).unwrap_or(Severity::Debug)
    }

    pub fn set(&self, severity: Severity) {
        self.0.store(severity.rank(), AtomicOrdering::Relaxed);
    }
}

impl Default for SeverityCell {
    fn default() -> Self {
        Self::new(Severity::Debug)
    }
}
