//! The logging facade
//!
//! A [`Dispatcher`] filters records by its own threshold and hands admitted ones
//! to each enabled sink, in the fixed order console, file, view. Each sink then
//! applies its own threshold, so a record must clear both.

use std::sync::Arc;

use crate::config::LoggingConfig;
use crate::record::{LogRecord, Origin};
use crate::severity::{Severity, SeverityCell};
use crate::sink::{ConsoleSink, FileSink, Sink, SinkKind, ViewSink};

/// Which built-in sinks a [`Dispatcher::new`] should create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherOptions {
    pub enable_console: bool,
    pub enable_file: bool,
    pub enable_view: bool,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            enable_console: true,
            enable_file: true,
            enable_view: false,
        }
    }
}

/// Sink instances handed to a dispatcher, one optional slot per kind
#[derive(Clone, Default)]
pub struct SinkSet {
    console: Option<Arc<dyn Sink>>,
    file: Option<Arc<dyn Sink>>,
    view: Option<Arc<dyn Sink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn console(mut self, sink: Arc<dyn Sink>) -> Self {
        self.console = Some(sink);
        self
    }

    pub fn file(mut self, sink: Arc<dyn Sink>) -> Self {
        self.file = Some(sink);
        self
    }

    pub fn view(mut self, sink: Arc<dyn Sink>) -> Self {
        self.view = Some(sink);
        self
    }

    fn slot(&self, kind: SinkKind) -> Option<&Arc<dyn Sink>> {
        match kind {
            SinkKind::Console => self.console.as_ref(),
            SinkKind::File => self.file.as_ref(),
            SinkKind::View => self.view.as_ref(),
        }
    }
}

/// Leveled entry point fanning records out to its sinks
pub struct Dispatcher {
    log_level: SeverityCell,
    sinks: SinkSet,
}

impl Dispatcher {
    /// Dispatcher with freshly created default sinks for each enabled flag
    pub fn new(options: DispatcherOptions) -> Self {
        let mut sinks = SinkSet::new();
        if options.enable_console {
            sinks = sinks.console(Arc::new(ConsoleSink::stderr()));
        }
        if options.enable_file {
            sinks = sinks.file(Arc::new(FileSink::default()));
        }
        if options.enable_view {
            sinks = sinks.view(Arc::new(ViewSink::default()));
        }
        Self::with_sinks(sinks)
    }

    /// Dispatcher over caller-supplied sinks, threshold `Debug`
    pub fn with_sinks(sinks: SinkSet) -> Self {
        Self {
            log_level: SeverityCell::default(),
            sinks,
        }
    }

    /// Dispatcher built from configuration
    ///
    /// The view sink is returned alongside so the caller can render it; it is
    /// `None` when the view is disabled.
    pub fn from_config(config: &LoggingConfig) -> (Self, Option<Arc<ViewSink>>) {
        let mut sinks = SinkSet::new();
        if config.console.enabled {
            sinks = sinks.console(Arc::new(config.console.build_sink()));
        }
        if config.file.enabled {
            sinks = sinks.file(Arc::new(config.file.build_sink()));
        }
        let view = config
            .view
            .enabled
            .then(|| Arc::new(config.view.build_sink()));
        if let Some(view) = &view {
            sinks = sinks.view(Arc::clone(view) as Arc<dyn Sink>);
        }

        let dispatcher = Self::with_sinks(sinks);
        dispatcher.set_log_level(config.log_level);
        (dispatcher, view)
    }

    pub fn log_level(&self) -> Severity {
        self.log_level.get()
    }

    pub fn set_log_level(&self, severity: Severity) {
        self.log_level.set(severity);
    }

    /// Whether a record at `severity` would get past the dispatcher threshold
    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.log_level()
    }

    /// Kinds of the enabled sinks, in dispatch order
    pub fn enabled_kinds(&self) -> Vec<SinkKind> {
        SinkKind::ORDER
            .into_iter()
            .filter(|kind| self.sinks.slot(*kind).is_some())
            .collect()
    }

    /// The sink occupying a slot, e.g. to retune its threshold
    pub fn sink(&self, kind: SinkKind) -> Option<&Arc<dyn Sink>> {
        self.sinks.slot(kind)
    }

    fn active_sinks(&self) -> impl Iterator<Item = &Arc<dyn Sink>> {
        SinkKind::ORDER
            .into_iter()
            .filter_map(move |kind| self.sinks.slot(kind))
    }

    /// Send `message` to every enabled sink if `severity` clears the threshold
    ///
    /// Never fails: sinks swallow their own errors.
    pub fn log(&self, severity: Severity, message: &str, origin: Origin) {
        if !self.enabled(severity) {
            return;
        }

        let record = LogRecord::new(severity, message, origin);
        for sink in self.active_sinks() {
            sink.log(&record);
        }
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message, Origin::caller());
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message, Origin::caller());
    }

    #[track_caller]
    pub fn warning(&self, message: &str) {
        self.log(Severity::Warning, message, Origin::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message, Origin::caller());
    }

    pub fn debug_at(&self, message: &str, origin: Origin) {
        self.log(Severity::Debug, message, origin);
    }

    pub fn info_at(&self, message: &str, origin: Origin) {
        self.log(Severity::Info, message, origin);
    }

    pub fn warning_at(&self, message: &str, origin: Origin) {
        self.log(Severity::Warning, message, origin);
    }

    pub fn error_at(&self, message: &str, origin: Origin) {
        self.log(Severity::Error, message, origin);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatcherOptions::default())
    }
}
