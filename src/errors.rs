use thiserror::Error;

/// All errors that can occur in pwvault.
///
/// Messages never carry passphrases, key material or decrypted values.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Setup errors ---
    #[error("Vault is already initialized — reset it before running setup again")]
    AlreadyInitialized,

    #[error("Passphrase is too weak: {0}")]
    WeakPassphrase(String),

    #[error("Vault is not initialized — run `pwvault init` first")]
    NotInitialized,

    // --- Authentication errors ---
    #[error("Wrong passphrase")]
    WrongPassphrase,

    #[error("Vault is corrupted: {0} — a manual reset is required")]
    CorruptVault(String),

    #[error("Vault is locked — log in first")]
    Locked,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Entry errors ---
    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    #[error("Invalid entry: {0}")]
    Validation(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    #[error("Keyring error: {0}")]
    KeyringError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl VaultError {
    /// Whether the caller can sensibly retry or re-prompt.
    ///
    /// Corruption, crypto and storage failures are fatal for the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInitialized
                | Self::WeakPassphrase(_)
                | Self::NotInitialized
                | Self::WrongPassphrase
                | Self::Locked
                | Self::EntryNotFound(_)
                | Self::Validation(_)
        )
    }
}

/// Convenience type alias for pwvault results.
pub type Result<T> = std::result::Result<T, VaultError>;
