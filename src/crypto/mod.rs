//! Cryptographic primitives for pwvault.
//!
//! This module provides:
//! - PBKDF2 / Argon2id passphrase-based key derivation (`kdf`)
//! - HKDF splitting of the master key into verifier and vault key (`keys`)
//! - AES-256-GCM encryption and decryption of the vault blob (`encryption`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_master_key, ...};
pub use encryption::{decrypt, encrypt, VaultBlob};
pub use kdf::{derive_master_key, generate_salt, Argon2Params, KdfParams};
pub use keys::{DerivedKey, MasterKey};
