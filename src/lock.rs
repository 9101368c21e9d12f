//! Cross-process initialization lock.
//!
//! Replicas starting together race to provision the same database. The
//! first one to `flock(2)` the lock file provisions; the others poll until
//! it releases the lock, then find everything already in place.
//!
//! Locking goes through `fs2`: `flock(2)` on Unix, `LockFileEx` on
//! Windows. On Unix the lock is advisory and local to the host (or to
//! whatever filesystem the lock path is shared on).

use crate::error::{InitError, Result};
use anyhow::Context;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// An acquired initialization lock, released on drop.
#[derive(Debug)]
pub struct InitLock {
    file: Option<File>,
    path: PathBuf,
}

impl InitLock {
    /// Acquire the lock, polling every `poll_interval` for up to `timeout`.
    ///
    /// Contention is retried; any other failure to open or lock the file
    /// is returned immediately.
    pub fn acquire(path: &Path, timeout: Duration, poll_interval: Duration) -> Result<Self> {
        let start = Instant::now();

        loop {
            if let Some(lock) = Self::try_acquire(path)? {
                return Ok(lock);
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                warn!(
                    "Failed to acquire lock after {} seconds",
                    timeout.as_secs()
                );
                return Err(InitError::LockTimeout {
                    path: path.to_path_buf(),
                    waited_secs: timeout.as_secs(),
                });
            }

            info!(
                "Waiting for initialization lock... ({}s)",
                elapsed.as_secs()
            );
            thread::sleep(poll_interval.min(timeout - elapsed));
        }
    }

    /// Make a single non-blocking attempt. `Ok(None)` means another holder.
    pub fn try_acquire(path: &Path) -> Result<Option<Self>> {
        let lock_err = |source| InitError::Lock {
            path: path.to_path_buf(),
            source,
        };

        // Never truncate before holding the lock: the holder's pid lives there.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(lock_err)?;

        if let Err(e) = FileExt::try_lock_exclusive(&file) {
            if is_contended(&e) {
                return Ok(None);
            }
            return Err(lock_err(e));
        }

        let pid = std::process::id();
        record_pid(&mut file, pid)
            .with_context(|| format!("Failed to record pid in {}", path.display()))?;

        info!("Lock acquired by process {}", pid);
        Ok(Some(Self {
            file: Some(file),
            path: path.to_path_buf(),
        }))
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock now. Errors are logged, not returned.
    pub fn release(mut self) {
        self.unlock();
    }

    fn unlock(&mut self) {
        if let Some(file) = self.file.take() {
            match FileExt::unlock(&file) {
                Ok(()) => info!("Lock released by process {}", std::process::id()),
                Err(e) => warn!("Error releasing lock {}: {}", self.path.display(), e),
            }
        }
    }
}

impl Drop for InitLock {
    fn drop(&mut self) {
        self.unlock();
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

fn record_pid(file: &mut File, pid: u32) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", pid)?;
    file.flush()
}
