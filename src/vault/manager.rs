//! High-level vault operations.
//!
//! `VaultManager` wires the store, the gate and the cipher together so
//! that callers work with simple method calls like
//! `vault.add_entry("Email", "hunter2", "")`.
//!
//! Every mutation is a full round trip: copy the document, change the
//! copy, serialize, encrypt under a fresh nonce, persist, and only then
//! swap the copy into the session. If persisting fails, memory and
//! storage both still hold the previous state.

use tracing::{debug, info};
use uuid::Uuid;

use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};
use crate::storage::KeyValueStore;

use super::entry::{CredentialEntry, EntryUpdate, VaultDocument};
use super::gate::{seal, AuthenticationGate};
use super::store::VaultStore;

/// The vault handle. Owns its backend; one instance per vault.
pub struct VaultManager<S> {
    store: VaultStore<S>,
    gate: AuthenticationGate,
    kdf_params: KdfParams,
}

impl<S: KeyValueStore> VaultManager<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// A locked manager over `backend`, using the default KDF for setup.
    pub fn new(backend: S) -> Self {
        Self::with_kdf_params(backend, KdfParams::default())
    }

    /// Like `new`, but `setup` will use `params`. Existing vaults always
    /// use the parameters recorded at their own setup.
    pub fn with_kdf_params(backend: S, params: KdfParams) -> Self {
        Self {
            store: VaultStore::new(backend),
            gate: AuthenticationGate::new(),
            kdf_params: params,
        }
    }

    pub fn backend(&self) -> &S {
        self.store.backend()
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    pub fn is_initialized(&self) -> Result<bool> {
        self.store.is_initialized()
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    /// Create the vault with `passphrase` and leave it unlocked.
    pub fn setup(&mut self, passphrase: &str) -> Result<()> {
        self.gate.setup(&self.store, passphrase, self.kdf_params)
    }

    pub fn login(&mut self, passphrase: &str) -> Result<()> {
        self.gate.login(&self.store, passphrase)
    }

    pub fn lock(&mut self) {
        self.gate.lock();
    }

    /// Destroy the vault: lock and delete every persisted record.
    ///
    /// Works while locked, since a corrupt vault can never be unlocked.
    pub fn reset(&mut self) -> Result<()> {
        self.gate.lock();
        self.store.clear()?;
        info!("vault reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// All entries in insertion order, secrets included.
    pub fn list_entries(&self) -> Result<&[CredentialEntry]> {
        Ok(self.gate.session()?.document().entries())
    }

    pub fn get_entry(&self, id: Uuid) -> Result<&CredentialEntry> {
        self.gate
            .session()?
            .document()
            .get(id)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))
    }

    /// Entries whose name or notes contain `query`, ignoring case.
    pub fn search(&self, query: &str) -> Result<Vec<&CredentialEntry>> {
        Ok(self
            .list_entries()?
            .iter()
            .filter(|e| e.matches(query))
            .collect())
    }

    /// When the vault document was first created.
    pub fn created_at(&self) -> Result<chrono::DateTime<chrono::Utc>> {
        Ok(self.gate.session()?.document().created_at())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add an entry and persist. Returns the stored entry.
    pub fn add_entry(&mut self, name: &str, secret: &str, notes: &str) -> Result<CredentialEntry> {
        let mut document = self.gate.session()?.document().clone();
        let entry = document.add(name, secret, notes)?.clone();
        self.commit(document)?;
        debug!(id = %entry.id(), "entry added");
        Ok(entry)
    }

    /// Merge `update` into the entry with `id` and persist.
    ///
    /// An empty update changes nothing and writes nothing.
    pub fn update_entry(&mut self, id: Uuid, update: EntryUpdate) -> Result<CredentialEntry> {
        if update.is_empty() {
            return self.get_entry(id).cloned();
        }
        let mut document = self.gate.session()?.document().clone();
        let entry = document.update(id, &update)?.clone();
        self.commit(document)?;
        debug!(id = %id, "entry updated");
        Ok(entry)
    }

    /// Remove the entry with `id` and persist.
    pub fn delete_entry(&mut self, id: Uuid) -> Result<()> {
        let mut document = self.gate.session()?.document().clone();
        document.remove(id)?;
        self.commit(document)?;
        debug!(id = %id, "entry deleted");
        Ok(())
    }

    /// Encrypt and persist `document`, then make it the session document.
    fn commit(&mut self, document: VaultDocument) -> Result<()> {
        let session = self.gate.session_mut()?;
        let blob = seal(session.key(), &document)?;
        self.store.save_blob(&blob)?;
        debug!(entries = document.len(), "vault document committed");
        session.replace_document(document);
        Ok(())
    }
}
