//! Path-scoped write coordination for the file sink
//!
//! Within a process, every `FileLock` for the same path shares one mutex, so
//! separate sink instances writing one file are serialized on every platform.
//! The path is compared as given, not canonicalized. Writers in other processes
//! are serialized by an exclusive advisory lock on a sidecar `<file>.lock` next
//! to the target (unix only). The sidecar is never deleted, so rotation of
//! the target file cannot pull the lock out from under a waiting writer.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Named lock covering one log file path
#[derive(Debug)]
pub struct FileLock {
    lock_path: PathBuf,
    local: Arc<Mutex<()>>,
}

/// In-process mutex for `lock_path`, shared by every lock on that path
fn local_mutex(lock_path: &Path) -> Arc<Mutex<()>> {
    static REGISTRY: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();
    let mut registry = REGISTRY
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    Arc::clone(registry.entry(lock_path.to_path_buf()).or_default())
}

/// Held while the target file is being inspected, rotated or appended to
pub struct FileLockGuard<'a> {
    _local: MutexGuard<'a, ()>,
    // Closing the descriptor releases the advisory lock
    _file: File,
}

impl FileLock {
    /// Lock scoped to `target`
    pub fn for_target(target: &Path) -> Self {
        let mut name = target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        let lock_path = target.with_file_name(name);
        Self {
            local: local_mutex(&lock_path),
            lock_path,
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Block until both the in-process and the cross-process lock are held
    ///
    /// The parent directory of the target must already exist.
    pub fn acquire(&self) -> io::Result<FileLockGuard<'_>> {
        // A panic while holding the lock leaves no partial state worth guarding
        let local = self.local.lock().unwrap_or_else(|e| e.into_inner());

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;
        lock_exclusive(&file)?;

        Ok(FileLockGuard {
            _local: local,
            _file: file,
        })
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    loop {
        // SAFETY: fd is a valid open descriptor owned by `file` for this call
        let rc = unsafe { libc::flock(fd, libc::LOCK_EX) };
        if rc == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> io::Result<()> {
    // Only in-process serialization on this platform
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_is_sidecar() {
        let lock = FileLock::for_target(Path::new("/tmp/logs/app.log"));
        assert_eq!(lock.lock_path(), Path::new("/tmp/logs/app.log.lock"));
    }

    #[test]
    fn test_acquire_creates_sidecar() {
        let temp_dir = TempDir::new().unwrap();
        let lock = FileLock::for_target(&temp_dir.path().join("app.log"));
        {
            let _guard = lock.acquire().unwrap();
            assert!(lock.lock_path().exists());
        }
        // Released on drop, so it can be taken again
        let _guard = lock.acquire().unwrap();
    }

    #[test]
    fn test_acquire_fails_without_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let lock = FileLock::for_target(&temp_dir.path().join("missing").join("app.log"));
        assert!(lock.acquire().is_err());
    }

    #[test]
    fn test_locks_on_same_path_share_mutex() {
        let temp_dir = TempDir::new().unwrap();
        let first = FileLock::for_target(&temp_dir.path().join("app.log"));
        let second = FileLock::for_target(&temp_dir.path().join("app.log"));
        let other = FileLock::for_target(&temp_dir.path().join("other.log"));

        assert!(Arc::ptr_eq(&first.local, &second.local));
        assert!(!Arc::ptr_eq(&first.local, &other.local));
    }

    #[test]
    fn test_separate_locks_on_same_path_serialize_threads() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("app.log");
        let inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = FileLock::for_target(&target);
                let inside = Arc::clone(&inside);
                std::thread::spawn(move || {
                    let _guard = lock.acquire().unwrap();
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    std::thread::sleep(std::time::Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_lock_serializes_threads() {
        let temp_dir = TempDir::new().unwrap();
        let lock = Arc::new(FileLock::for_target(&temp_dir.path().join("app.log")));
        let inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = Arc::clone(&lock);
                let inside = Arc::clone(&inside);
                std::thread::spawn(move || {
                    let _guard = lock.acquire().unwrap();
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    std::thread::sleep(std::time::Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
