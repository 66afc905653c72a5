//! Interactive operator console.
//!
//! Reads commands from stdin and supervisor events concurrently. Boot
//! progress is followed on a background task so `kill` and `status` stay
//! usable while the server boots.

mod command;

pub use command::{ConsoleCommand, ConsoleParseError};

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use mcctl_core::{
    ArchiveError, Panel, RestartTicket, ServerState, SupervisorError, SupervisorEvent,
    TicketTarget,
};
use mcctl_runtime::StartOutcome;
use mcctl_runtime::system::{DEFAULT_PING_HOST, ping_host, request_reboot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{
    TerminalSink, archive_list_panel, fetch_failed_panel, help_panel, history_row,
    live_page_panel, message_panel, ping_panel, reboot_panel, start_refused_panel, status_panel,
    stop_refused_panel,
};

/// How long `quit` waits for a shutdown already in progress.
const SHUTDOWN_WAIT: Duration = Duration::from_secs(15);

/// Whether the console keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Console session state.
pub struct Console {
    ctx: CliContext,
    sink: Arc<TerminalSink>,
    boot_watch: Option<JoinHandle<()>>,
}

impl Console {
    pub fn new(ctx: CliContext, sink: Arc<TerminalSink>) -> Self {
        Self {
            ctx,
            sink,
            boot_watch: None,
        }
    }

    pub const fn context(&self) -> &CliContext {
        &self.ctx
    }

    /// Report a restart ticket left behind by a host reboot.
    pub fn announce_restart(&self) {
        match self.ctx.tickets.take() {
            Ok(Some(ticket)) => {
                info!(requester = %ticket.requester(), "Host restart completed");
                self.sink.panel(
                    &Panel::new("Host Restarted")
                        .row(format!("Requested by: {}", ticket.requester()))
                        .row(format!(
                            "Requested at: {}",
                            ticket.issued_at.format("%Y-%m-%d %H:%M:%S UTC")
                        ))
                        .row("The host is back online."),
                );
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not read restart ticket"),
        }
    }

    /// Start-up banner.
    pub fn greet(&self) {
        let history = self.ctx.supervisor.history();
        self.sink.panel(
            &Panel::new("mcctl")
                .row(format!("Server directory: {}", self.ctx.settings.server_dir.display()))
                .row(history_row(&history))
                .row("Type `help` for a list of commands."),
        );
    }

    /// Parse and run one input line.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        match line.parse::<ConsoleCommand>() {
            Ok(command) => self.execute(command).await,
            Err(e) => {
                self.sink.panel(&message_panel("Console", e.to_string()));
                Flow::Continue
            }
        }
    }

    pub async fn execute(&mut self, command: ConsoleCommand) -> Flow {
        debug!(?command, "Console command");
        match command {
            ConsoleCommand::Start => self.start().await,
            ConsoleCommand::Stop => self.stop().await,
            ConsoleCommand::Kill => self.kill().await,
            ConsoleCommand::Status => self.status().await,
            ConsoleCommand::ListLogs(limit) => self.list_logs(limit),
            ConsoleCommand::GetLog(name) => self.get_log(&name),
            ConsoleCommand::Live(page) => self.live(page),
            ConsoleCommand::Ping => self.ping().await,
            ConsoleCommand::Reboot => return self.reboot().await,
            ConsoleCommand::Help => self.sink.panel(&help_panel()),
            ConsoleCommand::Quit => {
                self.shutdown().await;
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    async fn start(&mut self) {
        let supervisor = Arc::clone(&self.ctx.supervisor);
        match supervisor.start().await {
            Ok(StartOutcome::Started { archive }) => {
                self.sink.panel(
                    &Panel::new("Server Boot")
                        .row("Requesting the server controller to boot up the server...")
                        .row(format!("Logging to: {archive}")),
                );
                self.follow_boot();
            }
            Ok(StartOutcome::AlreadyRunning(ServerState::Starting)) => {
                self.sink
                    .panel(&start_refused_panel(ServerState::Starting, self.ctx.access_point()));
                self.follow_boot();
            }
            Ok(StartOutcome::AlreadyRunning(state)) => {
                self.sink
                    .panel(&start_refused_panel(state, self.ctx.access_point()));
            }
            Err(e) => {
                error!(error = %e, "Failed to start server");
                self.sink.panel(&message_panel("Server Boot Failed", e.to_string()));
            }
        }
    }

    /// Follow boot progress on a background task, once.
    fn follow_boot(&mut self) {
        if self.boot_watch.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("Boot progress is already being followed");
            return;
        }
        let supervisor = Arc::clone(&self.ctx.supervisor);
        let sink = Arc::clone(&self.sink);
        self.boot_watch = Some(tokio::spawn(async move {
            match supervisor.watch_boot(sink.as_ref()).await {
                Ok(outcome) => debug!(?outcome, "Boot watch finished"),
                Err(e) => debug!(error = %e, "Boot watch ended"),
            }
        }));
    }

    async fn stop(&self) {
        let state = self.ctx.supervisor.state();
        if state != ServerState::On {
            self.sink.panel(&stop_refused_panel(state));
            return;
        }
        match self.ctx.supervisor.stop(self.sink.as_ref()).await {
            Ok(outcome) => info!(?outcome, "Stop finished"),
            Err(SupervisorError::InvalidState { state, .. }) => {
                self.sink.panel(&stop_refused_panel(state));
            }
            Err(SupervisorError::NotRunning) => {
                self.sink.panel(&stop_refused_panel(ServerState::Off));
            }
            Err(e) => {
                error!(error = %e, "Failed to stop server");
                self.sink.panel(&message_panel("Server Shutdown", e.to_string()));
            }
        }
    }

    async fn kill(&mut self) {
        match self.ctx.supervisor.kill().await {
            Ok(previous) => {
                self.sink.panel(&message_panel(
                    "Server Killed",
                    format!("The server process was terminated while {previous}."),
                ));
            }
            Err(SupervisorError::NotRunning) => {
                self.sink.panel(&message_panel("Server Killed", "The server is already off."));
            }
            Err(e) => self.sink.panel(&message_panel("Server Killed", e.to_string())),
        }
        if let Some(watch) = self.boot_watch.take() {
            let _ = watch.await;
        }
    }

    async fn status(&self) {
        let supervisor = &self.ctx.supervisor;
        let players = if supervisor.state() == ServerState::On {
            Some(supervisor.connected_players().await)
        } else {
            None
        };
        self.sink.panel(&status_panel(
            &supervisor.status(),
            players.as_ref(),
            self.ctx.properties.as_ref(),
        ));
    }

    fn list_logs(&self, limit: Option<usize>) {
        match self.ctx.supervisor.list_archives(limit) {
            Ok(names) => self.sink.panel(&archive_list_panel(&names)),
            Err(e) => self.sink.panel(&message_panel("Existing Logs", e.to_string())),
        }
    }

    fn get_log(&self, name: &str) {
        let supervisor = &self.ctx.supervisor;
        match supervisor.fetch_archive(name) {
            Ok(content) => {
                self.sink.panel(
                    &Panel::new("Logs")
                        .row(format!("Looking for log with the filename: {name}"))
                        .row("Requested file found."),
                );
                self.sink.text(&content);
            }
            Err(e) => {
                let reason = match &e {
                    ArchiveError::NotFound(_) => "Requested file was not found.".to_string(),
                    ArchiveError::InvalidName(_) => "That is not a valid log file name.".to_string(),
                    other => other.to_string(),
                };
                let latest = supervisor.archive().resolve("latest").ok();
                self.sink
                    .panel(&fetch_failed_panel(name, latest.as_deref(), &reason));
            }
        }
    }

    fn live(&self, page: usize) {
        let pages = self.ctx.supervisor.live_buffer();
        match pages.get(page) {
            Some(text) => {
                self.sink.panel(&live_page_panel(page, pages.len()));
                self.sink.text(text);
            }
            None if pages.is_empty() => self.sink.panel(&live_page_panel(0, 0)),
            None => self.sink.panel(&message_panel(
                "Live Logs",
                format!("There are only {} pages.", pages.len()),
            )),
        }
    }

    async fn ping(&self) {
        let received = Instant::now();
        let latency = ping_host(DEFAULT_PING_HOST).await;
        self.sink.panel(&ping_panel(latency, received.elapsed()));
    }

    async fn reboot(&mut self) -> Flow {
        let Some(command) = self.ctx.settings.reboot_command.clone() else {
            self.sink.panel(&reboot_panel(false));
            return Flow::Continue;
        };

        self.shutdown().await;

        let requester = std::env::var("USER").unwrap_or_else(|_| "operator".to_string());
        let ticket = RestartTicket::new(
            TicketTarget::User(requester),
            format!("console-{}", Utc::now().timestamp()),
        );
        if let Err(e) = self.ctx.tickets.write(&ticket) {
            warn!(error = %e, "Could not write restart ticket");
        }

        match request_reboot(&command) {
            Ok(()) => {
                self.sink.panel(&reboot_panel(true));
                Flow::Quit
            }
            Err(e) => {
                error!(error = %e, "Failed to request host reboot");
                // nobody will pick the ticket up
                if let Err(e) = self.ctx.tickets.take() {
                    warn!(error = %e, "Could not remove restart ticket");
                }
                self.sink.panel(&message_panel("Host Reboot", e.to_string()));
                Flow::Continue
            }
        }
    }

    /// Leave no child behind: stop it if ON, kill it if still booting.
    pub async fn shutdown(&mut self) {
        let supervisor = Arc::clone(&self.ctx.supervisor);
        match supervisor.state() {
            ServerState::Off => {}
            ServerState::On => self.stop().await,
            ServerState::Starting => self.kill().await,
            ServerState::Stopping => {
                let deadline = Instant::now() + SHUTDOWN_WAIT;
                while supervisor.state() != ServerState::Off && Instant::now() < deadline {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                if supervisor.state() != ServerState::Off {
                    warn!("Server is still shutting down");
                }
            }
        }
    }

    /// React to a supervisor event nobody asked for.
    pub fn on_event(&self, event: &SupervisorEvent) {
        match event {
            SupervisorEvent::Crashed {
                during: ServerState::On,
                ..
            } => self.sink.panel(&message_panel(
                "Server Crashed",
                "The server exited unexpectedly. Use [get-log latest] to see why.",
            )),
            SupervisorEvent::Stopped { in_band: true, .. } => self.sink.panel(&message_panel(
                "Server Stopped",
                "The server was shut down from inside the game.",
            )),
            other => debug!(state = %other.resulting_state(), "Supervisor event"),
        }
    }
}

/// Run the console until `quit`, end of input or Ctrl-C.
pub async fn run(ctx: CliContext) -> Result<(), CliError> {
    let sink = Arc::new(TerminalSink::stdout());
    let mut events = ctx.supervisor.subscribe();
    let mut console = Console::new(ctx, sink);

    console.announce_restart();
    console.greet();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if console.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                }
                None => {
                    console.shutdown().await;
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => console.on_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Console fell behind on events"),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                console.shutdown().await;
                break;
            }
        }
    }
    Ok(())
}
