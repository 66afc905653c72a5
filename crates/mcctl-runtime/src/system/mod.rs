//! Host-level probes and actions.
//!
//! Everything here shells out to system tools; failures degrade to `None`
//! or an error for the caller to report, never a panic.

mod ping;
mod reboot;

pub use ping::{DEFAULT_PING_HOST, parse_latency_ms, ping_host};
pub use reboot::request_reboot;
