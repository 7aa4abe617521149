//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::config::{Backend, Settings};
use crate::errors::{Result, VaultError};
use crate::storage::{FileStore, KeyValueStore};
use crate::vault::{check_passphrase, VaultManager};

/// Environment variable checked before prompting for the master passphrase.
pub const PASSPHRASE_ENV: &str = "PWVAULT_PASSPHRASE";

/// A vault over whichever backend the settings select.
pub type CliVault = VaultManager<Box<dyn KeyValueStore>>;

/// pwvault CLI: a local, passphrase-protected credential vault.
#[derive(Parser)]
#[command(
    name = "pwvault",
    about = "Local encrypted password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: <data dir>/pwvault)
    #[arg(long, env = "PWVAULT_DIR", global = true)]
    pub vault_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master passphrase
    Init,

    /// Show whether a vault exists and where it lives
    Status,

    /// Store a new credential (secret is read from stdin or a prompt)
    Add {
        /// Display name (e.g. "GitHub")
        name: String,
        /// Free-form notes stored alongside the secret
        #[arg(short, long, default_value = "")]
        notes: String,
    },

    /// List stored credentials
    List {
        /// Only show entries whose name or notes contain this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Print secrets in clear instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Show one credential, secret included
    Show {
        /// Entry id or a unique prefix of it
        id: String,
        /// Copy the secret to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Change fields of a credential
    Edit {
        /// Entry id or a unique prefix of it
        id: String,
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// Also replace the secret (read from stdin or a prompt)
        #[arg(long)]
        secret: bool,
    },

    /// Delete a credential
    Delete {
        /// Entry id or a unique prefix of it
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Destroy the vault and every credential in it
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault directory: `--vault-dir`, then `PWVAULT_DIR`
/// (both handled by clap), then the platform data directory.
pub fn vault_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.vault_dir {
        return Ok(dir.clone());
    }
    dirs::data_dir()
        .map(|d| d.join("pwvault"))
        .ok_or_else(|| {
            VaultError::ConfigError(
                "cannot determine a data directory; pass --vault-dir or set PWVAULT_DIR".into(),
            )
        })
}

/// Build the storage backend selected in `settings`.
pub fn open_backend(dir: &std::path::Path, settings: &Settings) -> Result<Box<dyn KeyValueStore>> {
    match settings.backend {
        Backend::File => Ok(Box::new(FileStore::open_locked(dir)?)),
        #[cfg(feature = "keyring-store")]
        Backend::Keyring => Ok(Box::new(crate::storage::KeyringStore::new(
            dir.to_string_lossy(),
        ))),
        #[cfg(not(feature = "keyring-store"))]
        Backend::Keyring => Err(VaultError::KeyringError(
            "this build has no keyring support; rebuild with --features keyring-store".into(),
        )),
    }
}

/// Open the (locked) vault for the directory selected on the command line.
///
/// With the file backend the vault directory stays locked against other
/// `pwvault` processes until the returned manager is dropped, so one
/// command's read, modify and write never interleaves with another's.
pub fn open_vault(cli: &Cli) -> Result<CliVault> {
    let dir = vault_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let params = settings.kdf_params()?;
    let backend = open_backend(&dir, &settings)?;
    Ok(VaultManager::with_kdf_params(backend, params))
}

/// Open the vault and log in with the master passphrase.
pub fn unlock_vault(cli: &Cli) -> Result<CliVault> {
    let mut vault = open_vault(cli)?;
    if !vault.is_initialized()? {
        return Err(VaultError::NotInitialized);
    }
    let passphrase = prompt_passphrase()?;
    vault.login(&passphrase)?;
    Ok(vault)
}

/// Get the master passphrase, trying in order:
/// 1. `PWVAULT_PASSPHRASE` env var (scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master passphrase")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master passphrase with confirmation (used during `init`).
///
/// Also respects `PWVAULT_PASSPHRASE`; a weak value from the environment
/// is an error, a weak value typed at the prompt asks again.
pub fn prompt_new_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = passphrase_from_env() {
        check_passphrase(&pw)?;
        return Ok(pw);
    }

    loop {
        let pw = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master passphrase")
                .with_confirmation(
                    "Confirm master passphrase",
                    "Passphrases do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?,
        );

        if let Err(e) = check_passphrase(&pw) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(pw);
    }
}

fn passphrase_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSPHRASE_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Read a secret value from piped stdin, or prompt for it without echo.
///
/// Trailing line breaks from piped input are dropped.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed_len = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed_len);
        return Ok(buf);
    }

    let secret = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Resolve a full entry id or a unique prefix of one.
pub fn resolve_id<S: KeyValueStore>(vault: &VaultManager<S>, input: &str) -> Result<Uuid> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(VaultError::Validation("entry id cannot be empty".into()));
    }

    if let Ok(id) = Uuid::parse_str(&needle) {
        return vault.get_entry(id).map(|e| e.id());
    }

    let matches: Vec<Uuid> = vault
        .list_entries()?
        .iter()
        .map(|e| e.id())
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(VaultError::EntryNotFound(input.to_string())),
        many => Err(VaultError::Validation(format!(
            "id prefix '{input}' matches {} entries; use more characters",
            many.len()
        ))),
    }
}

/// First eight characters of an id, as shown in tables.
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}
