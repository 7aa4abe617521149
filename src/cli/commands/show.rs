//! `pwvault show` — print one credential or copy its secret.

use crate::cli::output;
use crate::cli::{resolve_id, unlock_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: &str, copy: bool) -> Result<()> {
    let vault = unlock_vault(cli)?;
    let id = resolve_id(&vault, id)?;
    let entry = vault.get_entry(id)?;

    if copy {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| VaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
        clipboard
            .set_text(entry.secret().to_string())
            .map_err(|e| VaultError::CommandFailed(format!("clipboard write: {e}")))?;
        output::print_entry(entry, false);
        output::success(&format!("Secret of '{}' copied to clipboard", entry.name()));
    } else {
        output::print_entry(entry, true);
    }

    Ok(())
}
