//! `pwvault completions` — print a shell completion script to stdout.
//!
//! clap validates the shell name, so an unsupported shell never reaches here.
//!
//!   pwvault completions bash > ~/.local/share/bash-completion/completions/pwvault

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(shell, &mut stdout)?;
    stdout
        .flush()
        .map_err(|e| VaultError::CommandFailed(format!("writing completions: {e}")))
}

/// Render the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin, out);
    Ok(())
}
