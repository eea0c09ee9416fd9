//! Advisory lock shared by every process using the same data directory
//!
//! The lock is an OS-level exclusive lock on an open handle of `.lock`.
//! The kernel drops it when the holder closes the handle or its process
//! exits, so a crashed holder never leaves the store locked and a slow
//! holder can never be displaced by a waiter. The file itself stays on
//! disk between holders.

use crate::config::LockConfig;
use crate::error::{QueueError, Result};
use std::fs::{File, OpenOptions, TryLockError};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Held lock; released when dropped
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Acquire the lock at `path`, retrying while another holder has it
    pub fn acquire(path: &Path, config: &LockConfig) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        for attempt in 0..=config.retries {
            match file.try_lock() {
                Ok(()) => {
                    let mut lock = Self {
                        file,
                        path: path.to_path_buf(),
                    };
                    lock.record_holder();
                    return Ok(lock);
                },
                Err(TryLockError::WouldBlock) => {
                    if attempt < config.retries {
                        thread::sleep(backoff(config.retry_delay_ms, attempt));
                    }
                },
                Err(TryLockError::Error(e)) => return Err(e.into()),
            }
        }

        tracing::debug!(path = %path.display(), retries = config.retries, "Lock still held");
        Err(QueueError::LockTimeout {
            path: path.display().to_string(),
        })
    }

    /// Holder pid is informational only
    fn record_holder(&mut self) {
        let written = self
            .file
            .set_len(0)
            .and_then(|()| self.file.seek(SeekFrom::Start(0)))
            .and_then(|_| writeln!(self.file, "{}", std::process::id()));
        if let Err(e) = written {
            tracing::debug!(path = %self.path.display(), "Could not record lock holder: {e}");
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(path = %self.path.display(), "Failed to release lock: {e}");
        }
    }
}

/// Linear backoff capped at eight times the base delay
fn backoff(base_ms: u64, attempt: u32) -> Duration {
    let factor = u64::from(attempt.min(7)) + 1;
    Duration::from_millis(base_ms.saturating_mul(factor))
}
