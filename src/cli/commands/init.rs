//! `pwvault init` — create a new vault protected by a master passphrase.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_passphrase, vault_dir, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = vault_dir(cli)?;
    let mut vault = open_vault(cli)?;

    if vault.is_initialized()? {
        output::tip("Use `pwvault add` to store credentials in the existing vault.");
        return Err(VaultError::AlreadyInitialized);
    }

    output::info("The master passphrase cannot be recovered. If you lose it, the vault is gone.");
    let passphrase = prompt_new_passphrase()?;
    vault.setup(&passphrase)?;
    vault.lock();

    output::success(&format!("Vault created at {}", dir.display()));
    output::tip("Run `pwvault add <NAME>` to store your first credential.");

    Ok(())
}
