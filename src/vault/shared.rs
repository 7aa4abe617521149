//! Thread-safe handle for hosts that call into the vault concurrently.
//!
//! Each call takes the lock for its whole duration, so two mutations can
//! never interleave their read-modify-persist cycles.

use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::errors::{Result, VaultError};
use crate::storage::KeyValueStore;

use super::entry::{CredentialEntry, EntryUpdate};
use super::manager::VaultManager;

/// Cloneable, `Send + Sync` wrapper around one `VaultManager`.
pub struct SharedVault<S> {
    inner: Arc<Mutex<VaultManager<S>>>,
}

impl<S> Clone for SharedVault<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedVault<S> {
    pub fn new(manager: VaultManager<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Hold the lock across several operations.
    pub fn lock_manager(&self) -> Result<MutexGuard<'_, VaultManager<S>>> {
        self.inner
            .lock()
            .map_err(|_| VaultError::Storage("vault lock poisoned by a panicked caller".into()))
    }

    pub fn is_initialized(&self) -> Result<bool> {
        self.lock_manager()?.is_initialized()
    }

    pub fn is_unlocked(&self) -> Result<bool> {
        Ok(self.lock_manager()?.is_unlocked())
    }

    pub fn setup(&self, passphrase: &str) -> Result<()> {
        self.lock_manager()?.setup(passphrase)
    }

    pub fn login(&self, passphrase: &str) -> Result<()> {
        self.lock_manager()?.login(passphrase)
    }

    pub fn lock(&self) -> Result<()> {
        self.lock_manager()?.lock();
        Ok(())
    }

    pub fn reset(&self) -> Result<()> {
        self.lock_manager()?.reset()
    }

    pub fn list_entries(&self) -> Result<Vec<CredentialEntry>> {
        Ok(self.lock_manager()?.list_entries()?.to_vec())
    }

    pub fn get_entry(&self, id: Uuid) -> Result<CredentialEntry> {
        self.lock_manager()?.get_entry(id).cloned()
    }

    pub fn add_entry(&self, name: &str, secret: &str, notes: &str) -> Result<CredentialEntry> {
        self.lock_manager()?.add_entry(name, secret, notes)
    }

    pub fn update_entry(&self, id: Uuid, update: EntryUpdate) -> Result<CredentialEntry> {
        self.lock_manager()?.update_entry(id, update)
    }

    pub fn delete_entry(&self, id: Uuid) -> Result<()> {
        self.lock_manager()?.delete_entry(id)
    }
}
