//! Durable append-only file sink with record-count rotation
//!
//! Every write happens under a [`FileLock`]:
//! 1. count the records already in the file;
//! 2. delete the whole file if the count is over the limit;
//! 3. append one line, optionally syncing it to disk.
//!
//! Rotation is a full reset, not a rolling window. The delete and the following
//! append are not atomic: a crash in between leaves no file and loses all
//! history. That loss is accepted.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use super::lock::FileLock;
use super::Sink;
use crate::diagnostics;
use crate::paths::{CacheDirProvider, PathProvider};
use crate::record::LogRecord;
use crate::severity::{Severity, SeverityCell};

/// File name used when none is configured
pub const DEFAULT_FILE_NAME: &str = "corelog.log";

/// Record count above which the file is reset
pub const DEFAULT_MAX_RECORDS: usize = 5120;

/// Failures inside the file sink. None of them reach the caller; each one means
/// the current line is dropped.
#[derive(Debug, thiserror::Error)]
pub enum FileSinkError {
    #[error("no directory available for the log file; file logging disabled")]
    PathResolutionFailed,

    #[error("failed to create log directory {}: {source}", path.display())]
    DirectoryCreateFailed { path: PathBuf, source: io::Error },

    #[error("failed to open log file {}: {source}", path.display())]
    FileOpenFailed { path: PathBuf, source: io::Error },

    #[error("failed to write log file {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    #[error("failed to delete log file {} during rotation: {source}", path.display())]
    DeleteFailed { path: PathBuf, source: io::Error },

    #[error("failed to lock {}: {source}", path.display())]
    CoordinationFailed { path: PathBuf, source: io::Error },
}

/// Lifecycle of the sink's relationship with its file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// No write attempted yet, path not resolved
    Unresolved,
    /// Path resolved; the file itself may or may not exist
    Ready,
    /// Path resolution failed; the sink drops everything
    Degraded,
    /// The file is being deleted for rotation
    Rotating,
}

/// Tunables for a [`FileSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSinkOptions {
    pub file_name: String,
    pub max_records: usize,
    /// Call `fsync` after every line; slower, but survives power loss
    pub sync_after_each_write: bool,
}

impl Default for FileSinkOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            max_records: DEFAULT_MAX_RECORDS,
            sync_after_each_write: false,
        }
    }
}

struct Target {
    path: PathBuf,
    lock: FileLock,
}

/// Sink appending formatted records to a single log file
pub struct FileSink {
    min_severity: SeverityCell,
    provider: Box<dyn PathProvider>,
    options: FileSinkOptions,
    target: OnceLock<Option<Target>>,
    rotating: AtomicBool,
    remove_file: fn(&Path) -> io::Result<()>,
}

impl FileSink {
    /// File sink with default options in the directory supplied by `provider`
    pub fn new(provider: impl PathProvider + 'static) -> Self {
        Self::with_options(provider, FileSinkOptions::default())
    }

    pub fn with_options(provider: impl PathProvider + 'static, options: FileSinkOptions) -> Self {
        Self {
            min_severity: SeverityCell::default(),
            provider: Box::new(provider),
            options,
            target: OnceLock::new(),
            rotating: AtomicBool::new(false),
            remove_file: |path| fs::remove_file(path),
        }
    }

    pub fn options(&self) -> &FileSinkOptions {
        &self.options
    }

    pub fn state(&self) -> FileState {
        match self.target.get() {
            None => FileState::Unresolved,
            Some(None) => FileState::Degraded,
            Some(Some(_)) if self.rotating.load(Ordering::Relaxed) => FileState::Rotating,
            Some(Some(_)) => FileState::Ready,
        }
    }

    /// Resolve the log file path, once
    ///
    /// Later calls return the memoized result, including a failure.
    pub fn resolve_path(&self) -> Option<&Path> {
        self.target().map(|t| t.path.as_path())
    }

    /// The resolved log file path, or `None` when the sink is degraded
    pub fn path(&self) -> Option<&Path> {
        self.resolve_path()
    }

    /// Number of complete lines currently in the file (0 when missing)
    pub fn record_count(&self) -> usize {
        self.resolve_path()
            .and_then(|path| fs::read(path).ok())
            .map(|bytes| bytes.iter().filter(|&&b| b == b'\n').count())
            .unwrap_or(0)
    }

    fn target(&self) -> Option<&Target> {
        self.target
            .get_or_init(|| match self.provider.base_dir() {
                Some(dir) => {
                    let path = dir.join(&self.options.file_name);
                    Some(Target {
                        lock: FileLock::for_target(&path),
                        path,
                    })
                }
                None => {
                    diagnostics::report_failure(self.name(), &FileSinkError::PathResolutionFailed);
                    None
                }
            })
            .as_ref()
    }

    fn append(&self, target: &Target, line: &str) -> Result<(), FileSinkError> {
        // The lock's sidecar lives next to the file, so the directory comes first
        ensure_parent_dir(&target.path)?;

        let _guard = target
            .lock
            .acquire()
            .map_err(|source| FileSinkError::CoordinationFailed {
                path: target.lock.lock_path().to_path_buf(),
                source,
            })?;

        if split_count(&target.path) > self.options.max_records {
            self.rotate(&target.path);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&target.path)
            .map_err(|source| FileSinkError::FileOpenFailed {
                path: target.path.clone(),
                source,
            })?;

        let write_err = |source| FileSinkError::WriteFailed {
            path: target.path.clone(),
            source,
        };
        file.write_all(line.as_bytes()).map_err(write_err)?;
        if self.options.sync_after_each_write {
            file.sync_all().map_err(write_err)?;
        }

        Ok(())
    }

    /// Delete the file. Failure is reported and the write goes ahead anyway.
    fn rotate(&self, path: &Path) {
        self.rotating.store(true, Ordering::Relaxed);
        match (self.remove_file)(path) {
            Ok(()) => diagnostics::note(self.name(), "log file exceeded record limit and was reset"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => diagnostics::report_failure(
                self.name(),
                &FileSinkError::DeleteFailed {
                    path: path.to_path_buf(),
                    source,
                },
            ),
        }
        self.rotating.store(false, Ordering::Relaxed);
    }
}

impl Default for FileSink {
    /// File sink in the platform cache directory of the running executable
    fn default() -> Self {
        Self::new(CacheDirProvider::for_current_exe())
    }
}

impl Sink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    fn min_severity(&self) -> Severity {
        self.min_severity.get()
    }

    fn set_min_severity(&self, severity: Severity) {
        self.min_severity.set(severity);
    }

    fn emit(&self, record: &LogRecord) {
        let Some(target) = self.target() else {
            return;
        };

        let mut line = record.file_line();
        line.push('\n');

        if let Err(e) = self.append(target, &line) {
            diagnostics::report_failure(self.name(), &e);
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), FileSinkError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| FileSinkError::DirectoryCreateFailed {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Number of pieces the file content splits into on `\n`
///
/// A file of N complete lines yields N + 1 pieces (the last one empty), so the
/// rotation check fires on the write that follows the `max_records`-th line.
/// Unreadable or missing files count as empty.
fn split_count(path: &Path) -> usize {
    match fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => bytes.iter().filter(|&&b| b == b'\n').count() + 1,
        _ => 0,
    }
}
