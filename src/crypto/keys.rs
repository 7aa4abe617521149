//! Key splitting using HKDF-SHA256.
//!
//! The KDF output (`MasterKey`) never leaves process memory and is never
//! used directly. From it we derive:
//! - the **passphrase verifier**, persisted so logins can be checked
//!   before any decryption is attempted;
//! - the **vault key** (`DerivedKey`) fed to AES-256-GCM.
//!
//! Both come from independent HKDF `info` strings, so the stored verifier
//! reveals nothing about the vault key.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// Length of derived sub-keys (256 bits).
pub const KEY_LEN: usize = 32;

const VERIFIER_INFO: &[u8] = b"pwvault-verifier";
const VAULT_KEY_INFO: &[u8] = b"pwvault-vault-key";

/// Run HKDF-SHA256 expand with the given `info`.
///
/// The master key already has full entropy (it came out of the KDF), so
/// it is used directly as the PRK with a zero salt.
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// The raw KDF output. Zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Digest bytes for the persisted passphrase verifier.
    pub fn verifier_bytes(&self) -> Result<[u8; KEY_LEN]> {
        hkdf_derive(&self.bytes, VERIFIER_INFO)
    }

    /// The symmetric key used to encrypt the vault blob.
    pub fn vault_key(&self) -> Result<DerivedKey> {
        let mut bytes = hkdf_derive(&self.bytes, VAULT_KEY_INFO)?;
        let key = DerivedKey::new(bytes);
        bytes.zeroize();
        Ok(key)
    }
}

/// Symmetric key material for one unlocked session.
///
/// Has no serialization path and is zeroed when dropped, i.e. on lock.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build the AEAD cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifier_and_vault_key_are_independent() {
        let master = MasterKey::new([0x42; KEY_LEN]);
        let verifier = master.verifier_bytes().unwrap();
        let key = master.vault_key().unwrap();
        assert_ne!(&verifier, key.as_bytes());
    }

    #[test]
    fn split_is_deterministic() {
        let a = MasterKey::new([7; KEY_LEN]);
        let b = MasterKey::new([7; KEY_LEN]);
        assert_eq!(a.verifier_bytes().unwrap(), b.verifier_bytes().unwrap());
        assert_eq!(a.vault_key().unwrap().as_bytes(), b.vault_key().unwrap().as_bytes());
    }

    #[test]
    fn debug_output_hides_key_bytes() {
        let key = DerivedKey::new([0xAB; KEY_LEN]);
        let shown = format!("{key:?}");
        assert!(!shown.contains("171"));
        assert!(shown.contains("redacted"));
    }
}
