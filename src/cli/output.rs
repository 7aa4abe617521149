//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cli::short_id;
use crate::vault::CredentialEntry;

/// Longest run of mask characters printed for a hidden secret.
const MASK_MAX: usize = 12;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Replace a secret with bullets, one per character up to `MASK_MAX`.
pub fn mask(secret: &str) -> String {
    "\u{2022}".repeat(secret.chars().count().min(MASK_MAX))
}

/// Print a table of entries (Id, Name, Secret, Notes, Updated).
pub fn print_entries_table(entries: &[&CredentialEntry], show_secrets: bool) {
    if entries.is_empty() {
        info("No matching credentials.");
        tip("Run `pwvault add <NAME>` to store a credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Secret", "Notes", "Updated"]);

    for e in entries {
        let secret = if show_secrets {
            e.secret().to_string()
        } else {
            mask(e.secret())
        };
        table.add_row(vec![
            short_id(e.id()),
            e.name().to_string(),
            secret,
            e.notes().to_string(),
            e.updated_at().format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every field of one entry.
pub fn print_entry(entry: &CredentialEntry, show_secret: bool) {
    let secret = if show_secret {
        entry.secret().to_string()
    } else {
        mask(entry.secret())
    };
    println!("{:>8}  {}", style("Id").bold(), entry.id());
    println!("{:>8}  {}", style("Name").bold(), entry.name());
    println!("{:>8}  {}", style("Secret").bold(), secret);
    if !entry.notes().is_empty() {
        println!("{:>8}  {}", style("Notes").bold(), entry.notes());
    }
    println!(
        "{:>8}  {}",
        style("Created").bold(),
        entry.created_at().format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "{:>8}  {}",
        style("Updated").bold(),
        entry.updated_at().format("%Y-%m-%d %H:%M:%S")
    );
}
