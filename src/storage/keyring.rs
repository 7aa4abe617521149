//! OS keyring storage backend.
//!
//! Stores each vault key as a credential in the operating system's
//! secure store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! Credential stores hold text, so values are base64-encoded.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::KeyValueStore;
use crate::errors::{Result, VaultError};

/// Service name used in the OS keyring.
const SERVICE_NAME: &str = "pwvault";

/// Keyring-backed store. `namespace` keeps separate vaults apart.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    namespace: String,
}

impl KeyringStore {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<::keyring::Entry> {
        let user = format!("{}:{key}", self.namespace);
        ::keyring::Entry::new(SERVICE_NAME, &user)
            .map_err(|e| VaultError::KeyringError(format!("failed to create keyring entry: {e}")))
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.entry(key)?.get_password() {
            Ok(encoded) => BASE64
                .decode(encoded)
                .map(Some)
                .map_err(|e| VaultError::KeyringError(format!("stored value for {key} is not base64: {e}"))),
            Err(::keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VaultError::KeyringError(format!(
                "failed to read {key} from keyring: {e}"
            ))),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entry(key)?
            .set_password(&BASE64.encode(value))
            .map_err(|e| VaultError::KeyringError(format!("failed to store {key} in keyring: {e}")))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(::keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::KeyringError(format!(
                "failed to delete {key} from keyring: {e}"
            ))),
        }
    }
}
