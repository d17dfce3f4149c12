//! Call-site capturing logging macros
//!
//! Each macro fills the record origin with `file!()`, `module_path!()` and
//! `line!()`, and skips formatting entirely when the dispatcher would drop the
//! record.
//!
//! ```
//! use corelog::{log_info, Dispatcher, SinkSet};
//!
//! let logger = Dispatcher::with_sinks(SinkSet::new());
//! log_info!(logger, "loaded {} items", 3);
//! ```

/// Origin of the macro's call site
#[macro_export]
macro_rules! origin {
    () => {
        $crate::Origin::new(file!(), module_path!(), line!())
    };
}

#[macro_export]
macro_rules! log_at {
    ($logger:expr, $lvl:expr, $($arg:tt)*) => {{
        let __logger = &$logger;
        let __lvl = $lvl;
        if __logger.enabled(__lvl) {
            __logger.log(__lvl, &format!($($arg)*), $crate::origin!());
        }
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::Severity::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::Severity::Info, $($arg)*) };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::Severity::Warning, $($arg)*) };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => { $crate::log_at!($logger, $crate::Severity::Error, $($arg)*) };
}
