//! Directory-backed key-value store: one file per key.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::lock::DirLock;
use super::KeyValueStore;
use crate::errors::{Result, VaultError};

/// Stores each key as a file named after it inside `root`.
///
/// Every write goes to its own uniquely named temp file in the same
/// directory, which is synced and then renamed over the target, so readers
/// never see a half-written value. The directory is synced after the
/// rename so the new name survives a crash.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    lock: Option<Arc<DirLock>>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| {
                VaultError::Storage(format!("cannot create {}: {e}", root.display()))
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&root, fs::Permissions::from_mode(0o700))?;
            }
        }
        Ok(Self { root, lock: None })
    }

    /// Like [`FileStore::open`], but first waits for the directory lock and
    /// holds it until the last clone of the store is dropped. Other
    /// processes opening the same directory this way queue behind us.
    pub fn open_locked(root: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::open(root)?;
        let lock = DirLock::acquire(&store.root)?;
        tracing::debug!(dir = %store.root.display(), "vault directory locked");
        store.lock = Some(Arc::new(lock));
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Map a key to its file, refusing anything that could escape `root`.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-');
        if !valid {
            return Err(VaultError::Storage(format!("invalid storage key '{key}'")));
        }
        Ok(self.root.join(key))
    }

    #[cfg(unix)]
    fn sync_dir(&self) -> std::io::Result<()> {
        fs::File::open(&self.root)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_dir(&self) -> std::io::Result<()> {
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::Storage(format!("failed to read {key}: {e}"))),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let failed = |e: std::io::Error| VaultError::Storage(format!("failed to write {key}: {e}"));

        // Created 0600 on Unix and removed on drop unless persisted.
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(failed)?;
        tmp.write_all(value).map_err(failed)?;
        tmp.as_file().sync_all().map_err(failed)?;
        tmp.persist(&path).map_err(|e| failed(e.error))?;

        self.sync_dir().map_err(failed)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => self
                .sync_dir()
                .map_err(|e| VaultError::Storage(format!("failed to remove {key}: {e}"))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::Storage(format!("failed to remove {key}: {e}"))),
        }
    }
}
