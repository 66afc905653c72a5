//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Supervise a game server process from the terminal.
///
/// Without a subcommand the interactive console starts.
#[derive(Parser)]
#[command(name = "mcctl")]
#[command(about = "Start, stop and inspect a supervised game server")]
#[command(version)]
pub struct Cli {
    /// Config file to load instead of `$MCCTL_CONFIG` or `./mcctl.toml`
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand to run; the console when none was given.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Console)
    }
}
