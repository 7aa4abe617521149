use clap::Parser;
use pwvault::cli::commands;
use pwvault::cli::{output, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr and stay quiet unless PWVAULT_LOG asks for more.
    let filter = EnvFilter::try_from_env("PWVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Status => commands::status::execute(&cli),
        Commands::Add {
            ref name,
            ref notes,
        } => commands::add::execute(&cli, name, notes),
        Commands::List {
            ref filter,
            show_secrets,
        } => commands::list::execute(&cli, filter.as_deref(), show_secrets),
        Commands::Show { ref id, copy } => commands::show::execute(&cli, id, copy),
        Commands::Edit {
            ref id,
            ref name,
            ref notes,
            secret,
        } => commands::edit::execute(&cli, id, name.as_deref(), notes.as_deref(), secret),
        Commands::Delete { ref id, force } => commands::delete::execute(&cli, id, force),
        Commands::Reset { force } => commands::reset::execute(&cli, force),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
