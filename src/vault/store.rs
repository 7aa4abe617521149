//! Typed persistence of the vault's three records.
//!
//! `VaultStore` knows the key names and encodings; the backend only
//! moves bytes. Every save is a whole-value replacement, so atomicity
//! is whatever the backend guarantees for a single `set`.

use tracing::debug;

use crate::crypto::VaultBlob;
use crate::errors::Result;
use crate::storage::KeyValueStore;

use super::format::{decode_blob, encode_blob, KdfRecord, PassphraseVerifier};

/// Storage key of the KDF record (algorithm, params, salt).
pub const KDF_KEY: &str = "vault.kdf";

/// Storage key of the passphrase verifier.
pub const VERIFIER_KEY: &str = "vault.verifier";

/// Storage key of the encrypted vault blob.
pub const BLOB_KEY: &str = "vault.blob";

pub struct VaultStore<S> {
    backend: S,
}

impl<S: KeyValueStore> VaultStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// A vault is initialized once its verifier has been written.
    pub fn is_initialized(&self) -> Result<bool> {
        self.backend.contains(VERIFIER_KEY)
    }

    pub fn load_verifier(&self) -> Result<Option<PassphraseVerifier>> {
        self.backend
            .get(VERIFIER_KEY)?
            .map(|bytes| PassphraseVerifier::decode(&bytes))
            .transpose()
    }

    pub fn save_verifier(&self, verifier: &PassphraseVerifier) -> Result<()> {
        self.backend.set(VERIFIER_KEY, verifier.encode().as_bytes())
    }

    pub fn load_kdf(&self) -> Result<Option<KdfRecord>> {
        self.backend
            .get(KDF_KEY)?
            .map(|bytes| KdfRecord::from_bytes(&bytes))
            .transpose()
    }

    pub fn save_kdf(&self, record: &KdfRecord) -> Result<()> {
        self.backend.set(KDF_KEY, &record.to_bytes()?)
    }

    /// `Ok(None)` is the empty-vault case: nothing was ever saved.
    pub fn load_blob(&self) -> Result<Option<VaultBlob>> {
        self.backend
            .get(BLOB_KEY)?
            .map(|bytes| decode_blob(&bytes))
            .transpose()
    }

    pub fn save_blob(&self, blob: &VaultBlob) -> Result<()> {
        self.backend.set(BLOB_KEY, encode_blob(blob).as_bytes())?;
        debug!(bytes = blob.len(), "vault blob persisted");
        Ok(())
    }

    /// Remove every vault record. The verifier goes first so a partial
    /// reset reads as "not initialized".
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(VERIFIER_KEY)?;
        self.backend.remove(BLOB_KEY)?;
        self.backend.remove(KDF_KEY)?;
        Ok(())
    }
}
