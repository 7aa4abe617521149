//! Vault module — the encrypted credential store.
//!
//! This module provides:
//! - `CredentialEntry`, `EntryUpdate` and `VaultDocument` (`entry`)
//! - Persisted record formats: KDF record, verifier, blob encoding (`format`)
//! - Master passphrase policy (`policy`)
//! - Typed load/save of the records over a key-value backend (`store`)
//! - The locked/unlocked `AuthenticationGate` (`gate`)
//! - The public CRUD surface `VaultManager` (`manager`) and its
//!   thread-safe wrapper `SharedVault` (`shared`)

pub mod entry;
pub mod format;
pub mod gate;
pub mod manager;
pub mod policy;
pub mod shared;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{CredentialEntry, EntryUpdate, VaultDocument};
pub use format::{KdfRecord, PassphraseVerifier};
pub use gate::AuthenticationGate;
pub use manager::VaultManager;
pub use policy::check_passphrase;
pub use shared::SharedVault;
pub use store::VaultStore;
