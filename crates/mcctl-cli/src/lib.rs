//! Operator console and one-shot commands for the mcctl supervisor.
//!
//! `main.rs` is the composition root; everything testable lives here.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary for its top-level error type
use anyhow as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap, init_tracing, load_config};
pub use commands::{Commands, ConfigCommand, LogsCommand};
pub use error::CliError;
pub use parser::Cli;
