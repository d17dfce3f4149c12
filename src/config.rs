//! Logging configuration
//!
//! A TOML document selects the dispatcher threshold, which sinks are enabled and
//! how each one is tuned. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! log_level = "info"
//!
//! [file]
//! dir = "~/.myapp/logs"
//! max_records = 5120
//!
//! [view]
//! enabled = true
//! capacity = 500
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::{expand_dir, CacheDirProvider, FixedDir};
use crate::severity::Severity;
use crate::sink::{
    ConsoleSink, FileSink, FileSinkOptions, Sink, ViewSink, DEFAULT_FILE_NAME,
    DEFAULT_MAX_RECORDS, DEFAULT_VIEW_CAPACITY,
};

/// Top-level logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Dispatcher-wide threshold (default: debug)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub file: FileConfig,

    #[serde(default)]
    pub view: ViewConfig,
}

/// Console sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_log_level")]
    pub min_severity: Severity,
}

/// File sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_log_level")]
    pub min_severity: Severity,

    /// Directory for the log file; `~` is expanded. When unset the platform
    /// cache directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Sub-directory of the cache directory when `dir` is unset (default: the
    /// executable's name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Record count above which the file is reset (default: 5120)
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    #[serde(default)]
    pub sync_after_each_write: bool,
}

/// View sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_level")]
    pub min_severity: Severity,

    /// Lines kept for display (default: 255)
    #[serde(default = "default_view_capacity")]
    pub capacity: usize,
}

fn default_log_level() -> Severity {
    Severity::Debug
}

fn default_true() -> bool {
    true
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

fn default_view_capacity() -> usize {
    DEFAULT_VIEW_CAPACITY
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_severity: default_log_level(),
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_severity: default_log_level(),
            dir: None,
            app_name: None,
            file_name: default_file_name(),
            max_records: default_max_records(),
            sync_after_each_write: false,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_severity: default_log_level(),
            capacity: default_view_capacity(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Load configuration from file, or return default if not found
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse logging config")
    }

    /// Save configuration to file, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

impl ConsoleConfig {
    pub fn build_sink(&self) -> ConsoleSink {
        let sink = ConsoleSink::stderr();
        sink.set_min_severity(self.min_severity);
        sink
    }
}

impl FileConfig {
    pub fn options(&self) -> FileSinkOptions {
        FileSinkOptions {
            file_name: self.file_name.clone(),
            max_records: self.max_records,
            sync_after_each_write: self.sync_after_each_write,
        }
    }

    pub fn build_sink(&self) -> FileSink {
        let sink = match (&self.dir, &self.app_name) {
            (Some(dir), _) => FileSink::with_options(FixedDir(expand_dir(dir)), self.options()),
            (None, Some(name)) => {
                FileSink::with_options(CacheDirProvider::new(name.clone()), self.options())
            }
            (None, None) => {
                FileSink::with_options(CacheDirProvider::for_current_exe(), self.options())
            }
        };
        sink.set_min_severity(self.min_severity);
        sink
    }
}

impl ViewConfig {
    pub fn build_sink(&self) -> ViewSink {
        let sink = ViewSink::new(self.capacity);
        sink.set_min_severity(self.min_severity);
        sink
    }
}

/// Default location of the config file (`<config dir>/corelog/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("corelog").join("config.toml"))
}
