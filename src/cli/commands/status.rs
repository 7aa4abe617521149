//! `pwvault status` — report whether a vault exists, without unlocking it.

use crate::cli::output;
use crate::cli::{open_vault, vault_dir, Cli};
use crate::config::{Backend, Settings};
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = vault_dir(cli)?;
    let settings = Settings::load(&dir)?;
    let vault = open_vault(cli)?;

    output::info(&format!("Vault directory: {}", dir.display()));
    let backend = match settings.backend {
        Backend::File => "file",
        Backend::Keyring => "keyring",
    };
    output::info(&format!("Backend: {backend}"));

    if vault.is_initialized()? {
        output::success("Vault is initialized.");
    } else {
        output::warning("No vault found.");
        output::tip("Run `pwvault init` to create one.");
    }

    Ok(())
}
