//! Base directory resolution for file sinks

use std::path::PathBuf;

/// Supplies the directory a file sink writes into
///
/// Returning `None` means no directory could be determined; the sink then stops
/// writing for the rest of its life.
pub trait PathProvider: Send + Sync {
    fn base_dir(&self) -> Option<PathBuf>;
}

/// Platform cache directory, optionally narrowed to an application sub-directory
///
/// On Linux this is `$XDG_CACHE_HOME` or `~/.cache`, on macOS
/// `~/Library/Caches`.
#[derive(Debug, Clone, Default)]
pub struct CacheDirProvider {
    pub app_name: Option<String>,
}

impl CacheDirProvider {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: Some(app_name.into()),
        }
    }

    /// Cache directory named after the running executable
    pub fn for_current_exe() -> Self {
        let app_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()));
        Self { app_name }
    }
}

impl PathProvider for CacheDirProvider {
    fn base_dir(&self) -> Option<PathBuf> {
        let base = dirs::cache_dir()?;
        Some(match &self.app_name {
            Some(name) if !name.is_empty() => base.join(name),
            _ => base,
        })
    }
}

/// A directory chosen up front (configuration, tests)
#[derive(Debug, Clone)]
pub struct FixedDir(pub PathBuf);

impl PathProvider for FixedDir {
    fn base_dir(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

impl<F> PathProvider for F
where
    F: Fn() -> Option<PathBuf> + Send + Sync,
{
    fn base_dir(&self) -> Option<PathBuf> {
        self()
    }
}

/// Expand a leading `~` in a user-supplied directory
pub fn expand_dir(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_dir() {
        let provider = FixedDir(PathBuf::from("/tmp/corelog"));
        assert_eq!(provider.base_dir(), Some(PathBuf::from("/tmp/corelog")));
    }

    #[test]
    fn test_closure_provider_can_fail() {
        let provider = || None::<PathBuf>;
        assert!(provider.base_dir().is_none());
    }

    #[test]
    fn test_cache_dir_provider_appends_app_name() {
        // CI might not have a cache dir, but if it does the app name is the leaf
        if let Some(path) = CacheDirProvider::new("corelog-test").base_dir() {
            assert!(path.ends_with("corelog-test"));
        }
    }

    #[test]
    fn test_expand_dir_tilde() {
        let expanded = expand_dir("~/logs");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs"));
        }
        assert_eq!(expand_dir("/var/log"), PathBuf::from("/var/log"));
    }
}
