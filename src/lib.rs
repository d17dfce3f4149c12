//! corelog - leveled logging to console, file and an in-process view
//!
//! A [`Dispatcher`] filters records by severity and fans them out to a fixed set
//! of sinks. The file sink keeps a single append-only file capped at a record
//! count. Sink failures never reach the caller; they are reported through
//! [`diagnostics`].

pub mod config;
pub mod diagnostics;
pub mod dispatcher;
mod macros;
pub mod paths;
pub mod record;
pub mod severity;
pub mod sink;

pub use config::LoggingConfig;
pub use dispatcher::{Dispatcher, DispatcherOptions, SinkSet};
pub use record::{LogRecord, Origin};
pub use severity::Severity;
pub use sink::{ConsoleSink, FileSink, FileSinkOptions, Sink, SinkKind, ViewSink};
