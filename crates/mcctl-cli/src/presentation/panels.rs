//! Panels for console replies.

use std::time::Duration;

use mcctl_core::{
    BootRecord, Panel, PlayerQuery, ServerProperties, ServerState, format_duration, format_seconds,
};
use mcctl_runtime::SupervisorStatus;

/// Single-row panel.
pub fn message_panel(title: &str, row: impl Into<String>) -> Panel {
    Panel::new(title).row(row)
}

/// Reply to `start` when nothing was spawned.
pub fn start_refused_panel(state: ServerState, access_point: &str) -> Panel {
    let row = match state {
        ServerState::On => format!("Server is already online at: {access_point}"),
        ServerState::Stopping => {
            "Server is already shutting down, wait for it to completely shut off before starting again."
                .to_string()
        }
        ServerState::Starting => "Server is already starting up, syncing progress...".to_string(),
        ServerState::Off => "Server is off.".to_string(),
    };
    message_panel("Server Boot", row)
}

/// Reply to `stop` when no stop was attempted.
pub fn stop_refused_panel(state: ServerState) -> Panel {
    let row = match state {
        ServerState::Starting => "Wait until the server is on to shut it down. Use [kill] if it is stuck.",
        ServerState::Stopping => "The server is already shutting down.",
        ServerState::Off | ServerState::On => "The server is already off.",
    };
    message_panel("Server Shutdown", row)
}

/// Reply to `status`.
pub fn status_panel(
    status: &SupervisorStatus,
    players: Option<&PlayerQuery>,
    properties: Option<&ServerProperties>,
) -> Panel {
    let mut panel = Panel::new("Server Status");
    match status.state {
        ServerState::On => {
            panel = panel.row("Server is online.");
            match players {
                Some(PlayerQuery::Online(players)) => {
                    panel = panel.row(format!("Number of players online: {}", players.count()));
                    if let Some(names) = players.formatted() {
                        panel = panel.row(format!("Players online: {names}"));
                    }
                }
                _ => panel = panel.row("Number of players online: unknown"),
            }
            if let Some(uptime) = status.uptime {
                panel = panel.row(format!("Uptime: {}", format_duration(uptime)));
            }
            if let Some(boot) = status.boot {
                panel = panel.row(format!("Boot time: {}", format_duration(boot)));
            }
        }
        ServerState::Off => panel = panel.row("The server is currently off."),
        ServerState::Starting => {
            panel = panel.row("The server is already starting up, use [start] to see the progress.");
        }
        ServerState::Stopping => panel = panel.row("The server is shutting down."),
    }

    if let Some(properties) = properties {
        let mut world = Vec::new();
        if let Some(difficulty) = properties.difficulty() {
            world.push(format!("difficulty {difficulty}"));
        }
        if let Some(gamemode) = properties.gamemode() {
            world.push(format!("gamemode {gamemode}"));
        }
        if properties.hardcore() == Some(true) {
            world.push("hardcore".to_string());
        }
        if !world.is_empty() {
            panel = panel.row(format!("World: {}", world.join(", ")));
        }
    }

    let average = status
        .average_boot_secs
        .map_or_else(|| "no boots recorded".to_string(), format_seconds);
    panel.row(format!(
        "Average boot time: {average} ({} boots)",
        status.recorded_boots
    ))
}

/// Reply to `list-logs`.
pub fn archive_list_panel(names: &[String]) -> Panel {
    let panel = Panel::new("Existing Logs");
    if names.is_empty() {
        panel.row("No logs yet.")
    } else {
        panel.rows(names.iter().cloned())
    }
}

/// Reply to `get-log` for a name that could not be served.
pub fn fetch_failed_panel(requested: &str, latest: Option<&str>, reason: &str) -> Panel {
    let panel = Panel::new("Logs")
        .row(format!("Looking for log with the filename: {requested}"))
        .row(reason.to_string());
    let panel = match latest {
        Some(latest) => panel.row(format!(
            "If you want the most recent logs, the filename is {latest}"
        )),
        None => panel,
    };
    panel.row("Or try using [list-logs] to get a list of the existing files.")
}

/// Header for one page of the live buffer.
pub fn live_page_panel(page: usize, pages: usize) -> Panel {
    if pages == 0 {
        return message_panel("Live Logs", "No output captured yet.");
    }
    message_panel(
        "Live Logs",
        format!("Page {} of {pages}, newest lines first", page + 1),
    )
}

/// Reply to `ping`.
pub fn ping_panel(latency_ms: Option<f64>, processing: Duration) -> Panel {
    let host = latency_ms.map_or_else(|| "unavailable".to_string(), |ms| format!("{ms:.0}ms"));
    Panel::new("Ping")
        .row(format!("Host Ping: {host}"))
        .row(format!("Processing Time: {}ms", processing.as_millis()))
}

/// Reply to `reboot`.
pub fn reboot_panel(configured: bool) -> Panel {
    if configured {
        message_panel("Host Reboot", "Restarting the host...")
    } else {
        message_panel("Host Reboot", "No reboot command is configured.")
    }
}

/// Boot history summary shown at console start-up.
pub fn history_row(record: &BootRecord) -> String {
    match record.average() {
        Some(average) => format!(
            "{} boots recorded, averaging {}",
            record.len(),
            format_seconds(average)
        ),
        None => "No boots recorded yet.".to_string(),
    }
}

/// Reply to `help`.
pub fn help_panel() -> Panel {
    Panel::new("Commands").rows([
        "start             boot the server and follow its progress",
        "stop              stop the server and wait for confirmation",
        "kill              terminate a stuck server immediately",
        "status            state, players and boot statistics",
        "list-logs [n]     archived boot logs, newest first",
        "get-log <name>    print an archive (`latest` for the current one)",
        "live [page]       recent output, newest first",
        "ping              host network latency",
        "reboot            stop the server and reboot the host",
        "quit              stop the server if needed and exit",
    ])
}
