//! Terminal presentation for the console.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no supervisor calls
//! - Every operator-facing message is a [`mcctl_core::Panel`]

pub mod panels;
pub mod sink;

pub use panels::{
    archive_list_panel, fetch_failed_panel, help_panel, history_row, live_page_panel, message_panel,
    ping_panel, reboot_panel, start_refused_panel, status_panel, stop_refused_panel,
};
pub use sink::TerminalSink;
