//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Thin wrappers that parse CLI input, call the runtime and format output
//! - Output goes to a caller-supplied writer so handlers are testable
//! - No process control outside the console

pub mod config;
pub mod console;
pub mod logs;
