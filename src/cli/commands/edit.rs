//! `pwvault edit` — change the name, notes or secret of a credential.

use crate::cli::output;
use crate::cli::{read_secret, resolve_id, unlock_vault, Cli};
use crate::errors::Result;
use crate::vault::EntryUpdate;

/// Execute the `edit` command.
pub fn execute(
    cli: &Cli,
    id: &str,
    name: Option<&str>,
    notes: Option<&str>,
    replace_secret: bool,
) -> Result<()> {
    if name.is_none() && notes.is_none() && !replace_secret {
        output::warning("Nothing to change.");
        output::tip("Pass --name, --notes or --secret.");
        return Ok(());
    }

    let mut vault = unlock_vault(cli)?;
    let id = resolve_id(&vault, id)?;

    let mut update = EntryUpdate::default();
    if let Some(name) = name {
        update = update.name(name);
    }
    if let Some(notes) = notes {
        update = update.notes(notes);
    }
    if replace_secret {
        let label = vault.get_entry(id)?.name().to_string();
        let secret = read_secret(&format!("New secret for {label}"))?;
        update = update.secret(secret.as_str());
    }

    let entry = vault.update_entry(id, update)?;
    output::success(&format!("Updated '{}'", entry.name()));

    Ok(())
}
