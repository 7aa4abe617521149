//! Locked/unlocked state machine guarding the vault.
//!
//! ```text
//!            setup (no verifier yet)
//!   Locked ───────────────────────────▶ Unlocked
//!   Locked ──login (verifier matches)──▶ Unlocked
//!   Locked ◀──────────lock───────────── Unlocked
//! ```
//!
//! A session (vault key + decrypted document) only exists in the
//! `Unlocked` state and is dropped, and thereby zeroed, on `lock`.

use tracing::{info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::kdf::derive_master_key;
use crate::crypto::{decrypt, encrypt, DerivedKey, KdfParams, MasterKey, VaultBlob};
use crate::errors::{Result, VaultError};
use crate::storage::KeyValueStore;

use super::entry::VaultDocument;
use super::format::{KdfRecord, PassphraseVerifier};
use super::policy::check_passphrase;
use super::store::VaultStore;

/// Key and plaintext held while unlocked.
pub(crate) struct Session {
    key: DerivedKey,
    document: VaultDocument,
}

impl Session {
    pub(crate) fn key(&self) -> &DerivedKey {
        &self.key
    }

    pub(crate) fn document(&self) -> &VaultDocument {
        &self.document
    }

    pub(crate) fn replace_document(&mut self, document: VaultDocument) {
        self.document = document;
    }
}

enum GateState {
    Locked,
    Unlocked(Session),
}

pub struct AuthenticationGate {
    state: GateState,
}

impl Default for AuthenticationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticationGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Locked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, GateState::Unlocked(_))
    }

    /// First-time initialization. Persists the KDF record, an empty
    /// encrypted document and finally the verifier, then unlocks.
    pub fn setup<S: KeyValueStore>(
        &mut self,
        store: &VaultStore<S>,
        passphrase: &str,
        params: KdfParams,
    ) -> Result<()> {
        if store.is_initialized()? {
            return Err(VaultError::AlreadyInitialized);
        }
        check_passphrase(passphrase)?;
        params.validate()?;

        let record = KdfRecord::generate(params);
        let (verifier, key) = derive_credentials(passphrase, &record)?;
        let document = VaultDocument::new();
        let blob = seal(&key, &document)?;

        // Verifier last: until it exists the vault reads as uninitialized.
        store.save_kdf(&record)?;
        store.save_blob(&blob)?;
        store.save_verifier(&verifier)?;

        self.state = GateState::Unlocked(Session { key, document });
        info!("vault initialized");
        Ok(())
    }

    /// Check `passphrase` against the stored verifier, then decrypt.
    ///
    /// Any current session is discarded first, so a failed login always
    /// leaves the gate locked.
    pub fn login<S: KeyValueStore>(&mut self, store: &VaultStore<S>, passphrase: &str) -> Result<()> {
        self.lock();

        let stored = store.load_verifier()?.ok_or(VaultError::NotInitialized)?;

        // setup never accepts a passphrase that fails policy, so it cannot match.
        if check_passphrase(passphrase).is_err() {
            warn!("login rejected");
            return Err(VaultError::WrongPassphrase);
        }

        let record = store
            .load_kdf()?
            .ok_or_else(|| corrupt("key derivation record is missing"))?;
        let (candidate, key) = derive_credentials(passphrase, &record).map_err(|e| match e {
            VaultError::KeyDerivationFailed(_) => corrupt("key derivation record is unusable"),
            other => other,
        })?;
        if !stored.matches(&candidate) {
            warn!("login rejected");
            return Err(VaultError::WrongPassphrase);
        }

        let blob = store
            .load_blob()?
            .ok_or_else(|| corrupt("vault blob is missing"))?;
        let document = open(&key, &blob).map_err(|e| match e {
            VaultError::DecryptionFailed => corrupt("vault blob failed authentication"),
            other => other,
        })?;

        info!(entries = document.len(), "vault unlocked");
        self.state = GateState::Unlocked(Session { key, document });
        Ok(())
    }

    /// Drop the session. Locking a locked gate is a no-op.
    pub fn lock(&mut self) {
        if let GateState::Unlocked(_) = std::mem::replace(&mut self.state, GateState::Locked) {
            info!("vault locked");
        }
    }

    pub(crate) fn session(&self) -> Result<&Session> {
        match &self.state {
            GateState::Unlocked(session) => Ok(session),
            GateState::Locked => Err(VaultError::Locked),
        }
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut Session> {
        match &mut self.state {
            GateState::Unlocked(session) => Ok(session),
            GateState::Locked => Err(VaultError::Locked),
        }
    }
}

fn corrupt(reason: &str) -> VaultError {
    warn!(reason, "vault corruption detected");
    VaultError::CorruptVault(reason.to_string())
}

/// Run the KDF and split its output into verifier and vault key.
fn derive_credentials(
    passphrase: &str,
    record: &KdfRecord,
) -> Result<(PassphraseVerifier, DerivedKey)> {
    let mut master_bytes = derive_master_key(passphrase.as_bytes(), &record.salt, &record.params)?;
    let master = MasterKey::new(master_bytes);
    master_bytes.zeroize();

    let verifier = PassphraseVerifier::new(master.verifier_bytes()?);
    let key = master.vault_key()?;
    Ok((verifier, key))
}

/// Serialize and encrypt a document under a fresh nonce.
pub(crate) fn seal(key: &DerivedKey, document: &VaultDocument) -> Result<VaultBlob> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(document)
            .map_err(|e| VaultError::SerializationError(format!("vault document: {e}")))?,
    );
    encrypt(key, &plaintext)
}

/// Decrypt and deserialize a blob. AEAD failures stay `DecryptionFailed`.
pub(crate) fn open(key: &DerivedKey, blob: &VaultBlob) -> Result<VaultDocument> {
    let plaintext = Zeroizing::new(decrypt(key, blob)?);
    // serde messages can quote input, so the cause is not forwarded.
    serde_json::from_slice(&plaintext)
        .map_err(|_| VaultError::CorruptVault("vault document is unreadable".into()))
}
