//! Password-based key derivation.
//!
//! Two slow, salted, deterministic KDFs are supported:
//! - PBKDF2-HMAC-SHA256 (default, at least 100 000 iterations)
//! - Argon2id (memory-hard, configured via `Argon2Params`)
//!
//! The salt is random per installation and persisted next to the
//! verifier, so the same passphrase + `KdfParams` + salt always yields
//! the same master key.

use argon2::{Algorithm, Argon2, Params, Version};
use hmac::Hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum accepted PBKDF2 iteration count.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Upper bound on PBKDF2 iterations; anything above is not a real setting.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Minimum safe Argon2 memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Maximum Argon2 memory cost in KiB (4 GiB).
const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Maximum Argon2 passes and lanes.
const MAX_ARGON2_ITERATIONS: u32 = 64;
const MAX_ARGON2_PARALLELISM: u32 = 64;

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Which KDF to run, and with what cost.
///
/// Serialized inside the persisted `KdfRecord` with an `algorithm` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "kebab-case")]
pub enum KdfParams {
    Pbkdf2Sha256 { iterations: u32 },
    Argon2id(Argon2Params),
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: MIN_PBKDF2_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Reject parameter sets too weak to be worth running, or so large
    /// that running them would exhaust the machine.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Pbkdf2Sha256 { iterations } => {
                check_range(
                    "PBKDF2 iterations",
                    iterations,
                    MIN_PBKDF2_ITERATIONS,
                    MAX_PBKDF2_ITERATIONS,
                )?;
            }
            Self::Argon2id(p) => {
                check_range("Argon2 memory_kib", p.memory_kib, MIN_MEMORY_KIB, MAX_MEMORY_KIB)?;
                check_range("Argon2 iterations", p.iterations, 1, MAX_ARGON2_ITERATIONS)?;
                check_range("Argon2 parallelism", p.parallelism, 1, MAX_ARGON2_PARALLELISM)?;
            }
        }
        Ok(())
    }
}

fn check_range(what: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min {
        return Err(VaultError::KeyDerivationFailed(format!(
            "{what} must be at least {min} (got {value})"
        )));
    }
    if value > max {
        return Err(VaultError::KeyDerivationFailed(format!(
            "{what} must be at most {max} (got {value})"
        )));
    }
    Ok(())
}

/// Derive a 32-byte master key from a passphrase and salt.
///
/// The same passphrase + salt + params will always produce the same key.
pub fn derive_master_key(passphrase: &[u8], salt: &[u8], params: &KdfParams) -> Result<[u8; KEY_LEN]> {
    params.validate()?;

    let mut key = [0u8; KEY_LEN];
    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            pbkdf2::pbkdf2::<Hmac<Sha256>>(passphrase, salt, iterations, &mut key).map_err(
                |e| VaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")),
            )?;
        }
        KdfParams::Argon2id(p) => {
            let argon_params = Params::new(p.memory_kib, p.iterations, p.parallelism, Some(KEY_LEN))
                .map_err(|e| {
                    VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}"))
                })?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
                .hash_password_into(passphrase, salt, &mut key)
                .map_err(|e| {
                    VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
                })?;
        }
    }

    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
