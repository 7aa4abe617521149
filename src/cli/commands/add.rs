//! `pwvault add` — store a new credential.

use crate::cli::output;
use crate::cli::{read_secret, short_id, unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: &str, notes: &str) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let secret = read_secret(&format!("Secret for {}", name.trim()))?;

    let entry = vault.add_entry(name, &secret, notes)?;

    output::success(&format!(
        "Added '{}' ({}), {} credential(s) stored",
        entry.name(),
        short_id(entry.id()),
        vault.list_entries()?.len()
    ));
    output::tip(&format!("Run `pwvault show {}` to view it.", short_id(entry.id())));

    Ok(())
}
