//! CLI entry point - the composition root.
//!
//! Logging and settings are set up here; the console additionally gets a
//! supervisor via [`bootstrap`].

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use mcctl_cli::{Cli, CliError, Commands, bootstrap, handlers, init_tracing, load_config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let loaded = load_config(cli.config.as_deref())?;

    match cli.command_or_default() {
        Commands::Console => {
            let ctx = bootstrap(loaded.settings).await?;
            handlers::console::run(ctx).await?;
        }
        Commands::Logs { command } => {
            handlers::logs::execute(&loaded.settings, command, &mut io::stdout().lock())?;
        }
        Commands::Config { command } => {
            handlers::config::execute(&loaded, command, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}
