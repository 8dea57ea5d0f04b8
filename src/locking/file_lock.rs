//! Lock files guarding an output path against concurrent writers.

use crate::constants::LOCK_FILE_EXTENSION;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Lock file content for debugging.
#[derive(Debug, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process ID that holds the lock.
    pub pid: u32,
    /// Hostname of the machine.
    pub hostname: String,
    /// When the lock was acquired.
    pub started: DateTime<Utc>,
    /// Output file being written.
    pub output: PathBuf,
}

/// RAII guard for an output lock.
#[derive(Debug)]
pub struct FileLock {
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquire the lock for writing `output`.
    ///
    /// The lock file sits next to the output file.
    /// A lock left behind by a dead process on this host is removed first.
    pub fn acquire(output: &Path) -> Result<Self> {
        let lock_path = Self::lock_path_for(output);

        if Self::is_stale(&lock_path) {
            warn!("Removing stale lock {}", lock_path.display());
            Self::remove_stale(&lock_path)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true) // Fails if file exists
            .open(&lock_path);

        match file {
            Ok(mut f) => {
                let info = LockInfo {
                    pid: std::process::id(),
                    hostname: current_hostname(),
                    started: Utc::now(),
                    output: output.to_path_buf(),
                };

                let json = serde_json::to_string_pretty(&info).unwrap_or_else(|_| "{}".to_string());
                let _ = f.write_all(json.as_bytes());

                // Register for cleanup on signal
                register_lock(&lock_path);
                debug!("Acquired lock {}", lock_path.display());

                Ok(Self { lock_path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(Error::FileLocked { path: lock_path })
            }
            Err(e) => Err(Error::LockCreate {
                path: lock_path,
                source: e,
            }),
        }
    }

    /// Get the lock file path for an output file.
    pub fn lock_path_for(output: &Path) -> PathBuf {
        let name = output
            .file_name()
            .map_or_else(|| "output".into(), |n| n.to_string_lossy());
        output.with_file_name(format!("{name}{LOCK_FILE_EXTENSION}"))
    }

    /// Check if a lock file exists for `output`.
    pub fn is_locked(output: &Path) -> bool {
        Self::lock_path_for(output).exists()
    }

    /// Check if the lock at `lock_path` belongs to a process of this host
    /// that is no longer running.
    ///
    /// Unreadable lock files are never stale.
    pub fn is_stale(lock_path: &Path) -> bool {
        let Ok(body) = fs::read_to_string(lock_path) else {
            return false;
        };
        let Ok(info) = serde_json::from_str::<LockInfo>(&body) else {
            return false;
        };
        info.hostname == current_hostname() && !process_alive(info.pid)
    }

    /// Remove a stale lock.
    pub fn remove_stale(lock_path: &Path) -> Result<()> {
        match fs::remove_file(lock_path) {
            Ok(()) => Ok(()),
            // Another process cleaned it up first.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::LockRemove {
                path: lock_path.to_path_buf(),
                source: e,
            }),
        }
    }
}

fn current_hostname() -> String {
    hostname::get().map_or_else(
        |_| "unknown".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// Without a process table to inspect, every recorded holder counts as running.
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        unregister_lock(&self.lock_path);
    }
}

/// Global registry of active lock paths for cleanup on signal.
static ACTIVE_LOCKS: std::sync::LazyLock<std::sync::Mutex<Vec<PathBuf>>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(Vec::new()));

fn register_lock(path: &Path) {
    if let Ok(mut locks) = ACTIVE_LOCKS.lock() {
        locks.push(path.to_path_buf());
    }
}

fn unregister_lock(path: &Path) {
    if let Ok(mut locks) = ACTIVE_LOCKS.lock() {
        locks.retain(|p| p != path);
    }
}

/// Clean up all registered locks. Called on signal.
pub fn cleanup_all_locks() {
    if let Ok(locks) = ACTIVE_LOCKS.lock() {
        for lock_path in locks.iter() {
            let _ = fs::remove_file(lock_path);
        }
    }
}
