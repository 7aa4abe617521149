//! Persisted record formats.
//!
//! Three keys make up a vault in the key-value store:
//!
//! ```text
//! vault.kdf       JSON  {"version":1,"algorithm":...,<params>,"salt":"<base64>"}
//! vault.verifier  base64 of the 32-byte passphrase verifier
//! vault.blob      base64 of nonce ‖ ciphertext ‖ tag
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::crypto::kdf::{generate_salt, KdfParams, SALT_LEN};
use crate::crypto::keys::KEY_LEN;
use crate::crypto::VaultBlob;
use crate::errors::{Result, VaultError};

/// Current `vault.kdf` record version.
pub const CURRENT_VERSION: u8 = 1;

/// KDF algorithm, cost parameters and salt chosen at setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfRecord {
    pub version: u8,

    #[serde(flatten)]
    pub params: KdfParams,

    /// Random per-installation salt (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,
}

impl KdfRecord {
    /// A new record with a freshly generated salt.
    pub fn generate(params: KdfParams) -> Self {
        Self {
            version: CURRENT_VERSION,
            params,
            salt: generate_salt().to_vec(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| VaultError::SerializationError(format!("kdf record: {e}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let record: Self = serde_json::from_slice(bytes)
            .map_err(|e| VaultError::CorruptVault(format!("unreadable kdf record: {e}")))?;
        if record.version != CURRENT_VERSION {
            return Err(VaultError::CorruptVault(format!(
                "unsupported kdf record version {}, expected {CURRENT_VERSION}",
                record.version
            )));
        }
        if record.salt.len() != SALT_LEN {
            return Err(VaultError::CorruptVault(format!(
                "kdf record salt is {} bytes, expected {SALT_LEN}",
                record.salt.len()
            )));
        }
        record
            .params
            .validate()
            .map_err(|e| VaultError::CorruptVault(format!("kdf record rejected: {e}")))?;
        Ok(record)
    }
}

/// One-way digest of the master passphrase, checked before decrypting.
#[derive(Clone)]
pub struct PassphraseVerifier([u8; KEY_LEN]);

impl PassphraseVerifier {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Constant-time equality.
    pub fn matches(&self, other: &PassphraseVerifier) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }

    pub fn encode(&self) -> String {
        BASE64.encode(self.0)
    }

    pub fn decode(text: &[u8]) -> Result<Self> {
        let bytes = BASE64
            .decode(trim_ascii(text))
            .map_err(|_| VaultError::CorruptVault("verifier is not valid base64".into()))?;
        let digest: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| VaultError::CorruptVault("verifier has the wrong length".into()))?;
        Ok(Self(digest))
    }
}

impl std::fmt::Debug for PassphraseVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PassphraseVerifier(..)")
    }
}

pub fn encode_blob(blob: &VaultBlob) -> String {
    BASE64.encode(blob.as_bytes())
}

pub fn decode_blob(text: &[u8]) -> Result<VaultBlob> {
    BASE64
        .decode(trim_ascii(text))
        .map(VaultBlob::from_bytes)
        .map_err(|_| VaultError::CorruptVault("vault blob is not valid base64".into()))
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
