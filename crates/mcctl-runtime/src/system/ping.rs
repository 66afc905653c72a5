//! Round-trip latency via the system `ping` tool.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Host pinged when none is given.
pub const DEFAULT_PING_HOST: &str = "8.8.8.8";

const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Ping `host` once and return the latency in milliseconds.
///
/// `None` when `ping` is missing, the host is unreachable or the output
/// cannot be parsed.
pub async fn ping_host(host: &str) -> Option<f64> {
    let count_flag = if cfg!(windows) { "-n" } else { "-c" };
    let run = Command::new("ping")
        .args([count_flag, "1", host])
        .kill_on_drop(true)
        .output();

    let output = match timeout(PING_TIMEOUT, run).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!(error = %e, "Failed to run ping");
            return None;
        }
        Err(_) => {
            debug!(host, "Ping timed out");
            return None;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_latency_ms(&stdout)
}

/// Extract the latency from `ping` output.
///
/// Unix prints `time=12.3 ms` per reply; Windows prints a summary line
/// ending in `Average = 12ms`.
pub fn parse_latency_ms(output: &str) -> Option<f64> {
    output.lines().find_map(|line| {
        if let Some((_, rest)) = line.split_once("time=") {
            return rest
                .split_whitespace()
                .next()
                .map(|v| v.trim_end_matches("ms"))
                .and_then(|v| v.parse().ok());
        }
        if line.contains("Average") {
            return line
                .split_whitespace()
                .last()
                .map(|v| v.trim_end_matches("ms"))
                .and_then(|v| v.parse().ok());
        }
        None
    })
}
