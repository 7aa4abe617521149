//! Advisory lock serializing vault access across processes.
//!
//! On Unix an exclusive `flock` is held on `<vault_dir>/.pwvault.lock` for
//! the guard's lifetime. The kernel drops the lock if the process dies, so
//! a crashed writer never wedges the vault. Other platforms get no
//! cross-process exclusion.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::errors::{Result, VaultError};

/// Name of the lock file inside the vault directory.
pub const LOCK_FILE: &str = ".pwvault.lock";

/// Exclusive lock on a vault directory. Released on drop.
#[derive(Debug)]
pub struct DirLock {
    file: File,
}

impl DirLock {
    /// Block until the lock on `dir` is ours.
    pub fn acquire(dir: &Path) -> Result<Self> {
        let file = open_lock_file(dir)?;
        imp::lock(&file, true).map_err(|e| lock_error(dir, &e))?;
        Ok(Self { file })
    }

    /// Take the lock on `dir` if nobody holds it; `Ok(None)` otherwise.
    pub fn try_acquire(dir: &Path) -> Result<Option<Self>> {
        let file = open_lock_file(dir)?;
        match imp::lock(&file, false) {
            Ok(()) => Ok(Some(Self { file })),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(lock_error(dir, &e)),
        }
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = imp::unlock(&self.file);
    }
}

fn open_lock_file(dir: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(dir.join(LOCK_FILE))
        .map_err(|e| lock_error(dir, &e))
}

fn lock_error(dir: &Path, err: &std::io::Error) -> VaultError {
    VaultError::Storage(format!("cannot lock {}: {err}", dir.display()))
}

#[cfg(unix)]
mod imp {
    use std::fs::File;
    use std::os::unix::io::AsRawFd;

    pub fn lock(file: &File, blocking: bool) -> std::io::Result<()> {
        let op = if blocking {
            libc::LOCK_EX
        } else {
            libc::LOCK_EX | libc::LOCK_NB
        };
        loop {
            // SAFETY: the descriptor is owned by `file` and stays open for the call.
            let rc = unsafe { libc::flock(file.as_raw_fd(), op) };
            if rc == 0 {
                return Ok(());
            }
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    pub fn unlock(file: &File) -> std::io::Result<()> {
        // SAFETY: as above.
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
        if rc == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::fs::File;

    pub fn lock(_file: &File, _blocking: bool) -> std::io::Result<()> {
        Ok(())
    }

    pub fn unlock(_file: &File) -> std::io::Result<()> {
        Ok(())
    }
}
