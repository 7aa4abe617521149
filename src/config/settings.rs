use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{Argon2Params, KdfParams, MIN_PBKDF2_ITERATIONS};
use crate::errors::{Result, VaultError};

/// Key derivation function used when a new vault is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KdfAlgorithm {
    Pbkdf2Sha256,
    Argon2id,
}

/// Where the vault records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// One file per record inside the vault directory.
    File,
    /// The OS credential store (requires the `keyring-store` feature).
    Keyring,
}

/// Vault configuration, loaded from `<vault_dir>/.pwvault.toml`.
///
/// Every field has a sensible default so pwvault works out-of-the-box
/// without any config file at all. KDF settings only affect `init`;
/// an existing vault keeps the parameters it was created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_kdf_algorithm")]
    pub kdf_algorithm: KdfAlgorithm,

    /// PBKDF2-HMAC-SHA256 iteration count (default and minimum: 100 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    #[serde(default = "default_backend")]
    pub backend: Backend,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_kdf_algorithm() -> KdfAlgorithm {
    KdfAlgorithm::Pbkdf2Sha256
}

fn default_pbkdf2_iterations() -> u32 {
    MIN_PBKDF2_ITERATIONS
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_backend() -> Backend {
    Backend::File
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            kdf_algorithm: default_kdf_algorithm(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            backend: default_backend(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the vault directory.
    const FILE_NAME: &'static str = ".pwvault.toml";

    /// Load settings from `<vault_dir>/.pwvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(vault_dir: &Path) -> Result<Self> {
        let config_path = Self::path(vault_dir);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    pub fn path(vault_dir: &Path) -> PathBuf {
        vault_dir.join(Self::FILE_NAME)
    }

    /// Convert the KDF settings into crypto-layer params.
    ///
    /// Rejects values below the safety minimums instead of silently
    /// clamping them.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        let params = match self.kdf_algorithm {
            KdfAlgorithm::Pbkdf2Sha256 => KdfParams::Pbkdf2Sha256 {
                iterations: self.pbkdf2_iterations,
            },
            KdfAlgorithm::Argon2id => KdfParams::Argon2id(Argon2Params {
                memory_kib: self.argon2_memory_kib,
                iterations: self.argon2_iterations,
                parallelism: self.argon2_parallelism,
            }),
        };
        params
            .validate()
            .map_err(|e| VaultError::ConfigError(e.to_string()))?;
        Ok(params)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
