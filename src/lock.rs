//! Advisory lock serializing runs against one repository
//!
//! The lock file lives in the system temp directory, named after a digest of
//! the canonical repository path, so the MOOG tree itself is never touched.
//! The lock is released when [`RunLock`] is dropped or the process exits.

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Result, SetupError};
use crate::hash;

/// Lock file path for a canonical repository root
pub fn lock_path_for(repo_root: &Path) -> PathBuf {
    lock_dir().join(format!("moog-setup-{}.lock", hash::path_key(repo_root)))
}

/// Temp directory, never relative to the working directory
fn lock_dir() -> PathBuf {
    let dir = env::temp_dir();
    if dir.is_absolute() {
        dir
    } else {
        PathBuf::from("/tmp")
    }
}

/// Exclusive lock held for the duration of a run
#[derive(Debug)]
pub struct RunLock {
    #[allow(dead_code)]
    file: File,
}

impl RunLock {
    /// Take the lock without blocking; fails with `LockHeld` if another run has it
    pub fn try_acquire(path: &Path) -> Result<Self> {
        let io_err = |e: io::Error| SetupError::IoError {
            message: format!("cannot open lock file {}: {}", path.display(), e),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(io_err)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                file.set_len(0).map_err(io_err)?;
                writeln!(file, "{}", std::process::id()).map_err(io_err)?;
                debug!(path = %path.display(), "acquired run lock");
                Ok(Self { file })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Err(SetupError::LockHeld {
                path: path.display().to_string(),
            }),
            Err(e) => Err(io_err(e)),
        }
    }
}
