//! `pwvault reset` — destroy the vault.
//!
//! Needs no passphrase: a vault whose passphrase is lost, or whose records
//! are corrupted, can only be recovered from by starting over.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `reset` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let mut vault = open_vault(cli)?;

    if !vault.is_initialized()? {
        // Sweep records left behind by an interrupted `init`.
        vault.reset()?;
        output::info("No vault to reset.");
        return Ok(());
    }

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Permanently delete the vault and every credential in it?")
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.reset()?;
    output::success("Vault reset. Run `pwvault init` to start over.");

    Ok(())
}
