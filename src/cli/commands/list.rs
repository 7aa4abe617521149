//! `pwvault list` — display stored credentials in a table.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::Result;
use crate::vault::CredentialEntry;

/// Execute the `list` command.
pub fn execute(cli: &Cli, filter: Option<&str>, show_secrets: bool) -> Result<()> {
    let vault = unlock_vault(cli)?;

    let entries: Vec<&CredentialEntry> = match filter {
        Some(query) => vault.search(query)?,
        None => vault.list_entries()?.iter().collect(),
    };

    output::info(&format!(
        "{} of {} credential(s)",
        entries.len(),
        vault.list_entries()?.len()
    ));
    output::print_entries_table(&entries, show_secrets);

    Ok(())
}
