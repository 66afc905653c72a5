//! Subcommands of the `mcctl` binary.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive console that owns the server process (default)
    Console,

    /// Read per-boot log archives without starting a supervisor
    Logs {
        #[command(subcommand)]
        command: LogsCommand,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Log archive commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LogsCommand {
    /// List archive names, newest first
    List {
        /// Only show the newest N archives
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print one archive
    Show {
        /// Archive file name, or `latest`
        name: String,
    },
}

/// Configuration commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Load and validate the configuration, then print the effective settings
    Check,
}
