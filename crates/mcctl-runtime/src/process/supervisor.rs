//! Supervisor for a single game server child process.
//!
//! # Structure
//!
//! The caller drives `start`, `watch_boot`, `stop`, `kill` and the queries.
//! One background task per child consumes its output: it archives every
//! line, feeds the tail buffer and reacts to lifecycle markers. The two
//! sides share only the state cell, the tail buffer and the child handle,
//! each behind its own mutex; state changes go through compare-and-set so
//! the reader and the caller never both win a transition.
//!
//! Each spawned child gets a generation number. Work done on behalf of an
//! older generation (a killed child still draining its pipes) never touches
//! the current session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Local;
use mcctl_core::domain::{BootRecord, ConnectedPlayers, PlayerQuery, ServerState};
use mcctl_core::events::SupervisorEvent;
use mcctl_core::ports::{ArchiveError, ProgressSink, SupervisorError};
use mcctl_core::progress::{BootFailure, ProgressEstimator, ProgressUpdate, StopStage};
use mcctl_core::settings::{CommandSettings, SupervisorSettings, TimingSettings};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, MissedTickBehavior, sleep};
use tracing::{debug, error, info, trace, warn};

use super::archive::{ArchiveWriter, LogArchive};
use super::broadcaster::EventBroadcaster;
use super::command::LaunchSpec;
use super::markers::{Marker, MarkerSet};
use super::shutdown::{DEFAULT_TERM_GRACE, reap_or_shutdown, shutdown_child};
use super::stream::{StreamKind, spawn_stream_reader};
use super::tail::LogTailBuffer;
use super::types::{BootOutcome, StartOutcome, StopOutcome, SupervisorStatus};
use crate::history::{BootHistoryStore, persist_record};

/// Lines buffered between the pipe readers and the output loop.
const OUTPUT_CHANNEL_CAPACITY: usize = 256;

/// How long a child that announced its shutdown gets to exit by itself.
const EXIT_WAIT: Duration = Duration::from_secs(10);

/// Re-check interval while waiting for a players reply.
const PLAYERS_POLL_INTERVAL: Duration = Duration::from_millis(50);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Why a boot session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Crashed,
    Stopped,
    Killed,
}

/// Bookkeeping for one spawned child.
#[derive(Debug, Clone)]
struct BootSession {
    generation: u64,
    started_at: Instant,
    archive: String,
    /// Average before this boot; the progress bar compares against it.
    prior_average: Option<f64>,
    boot_duration: Option<Duration>,
    end: Option<SessionEnd>,
    timeout_reported: bool,
}

/// State shared between the caller and the output loop.
struct Shared {
    state: Mutex<ServerState>,
    tail: Mutex<LogTailBuffer>,
    child: Mutex<Option<Child>>,
    stdin: tokio::sync::Mutex<Option<ChildStdin>>,
    session: Mutex<Option<BootSession>>,
    /// Generation of the live child; bumped on start and on kill.
    generation: AtomicU64,
    /// Generation whose output most recently closed.
    output_closed: AtomicU64,
    history: Mutex<BootHistoryStore>,
    archive: LogArchive,
    markers: MarkerSet,
    events: EventBroadcaster,
    term_grace: Duration,
}

impl Shared {
    fn state(&self) -> ServerState {
        *lock(&self.state)
    }

    /// Move `from -> to` if the state is still `from`.
    fn transition(&self, from: ServerState, to: ServerState) -> bool {
        let mut state = lock(&self.state);
        if *state != from || !from.can_transition_to(to) {
            return false;
        }
        *state = to;
        info!(from = %from, to = %to, "Server state changed");
        true
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn has_child(&self) -> bool {
        lock(&self.child).is_some()
    }

    fn take_child(&self) -> Option<Child> {
        lock(&self.child).take()
    }

    async fn close_stdin(&self) {
        drop(self.stdin.lock().await.take());
    }

    fn session(&self) -> Option<BootSession> {
        lock(&self.session).clone()
    }

    fn update_session<F>(&self, generation: u64, f: F)
    where
        F: FnOnce(&mut BootSession),
    {
        if let Some(session) = lock(&self.session)
            .as_mut()
            .filter(|s| s.generation == generation)
        {
            f(session);
        }
    }

    fn end_session(&self, generation: u64, end: SessionEnd) {
        self.update_session(generation, |session| {
            session.end.get_or_insert(end);
        });
    }

    async fn send_command(&self, command: &str) -> Result<(), SupervisorError> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard.as_mut().ok_or(SupervisorError::StdinUnavailable)?;
        let mut line = command.trim_end().to_string();
        line.push('\n');
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(SupervisorError::Write)?;
        stdin.flush().await.map_err(SupervisorError::Write)?;
        debug!(command = %command.trim_end(), "Sent command to server");
        Ok(())
    }

    async fn on_ready(&self, generation: u64) {
        if !self.transition(ServerState::Starting, ServerState::On) {
            return;
        }
        let Some(boot) = self
            .session()
            .filter(|s| s.generation == generation)
            .map(|s| s.started_at.elapsed())
        else {
            return;
        };

        info!(boot_secs = boot.as_secs_f64(), "Server is online");
        // boot watchers only see the duration once history holds it
        self.persist_boot(boot).await;
        self.update_session(generation, |session| {
            session.boot_duration = Some(boot);
        });
        self.events
            .broadcast(SupervisorEvent::online(boot.as_secs_f64()));
    }

    /// Append `boot` to the history file on the blocking pool, then adopt it.
    async fn persist_boot(&self, boot: Duration) {
        let (path, updated) = {
            let history = lock(&self.history);
            (history.path().to_path_buf(), history.with_boot(boot))
        };
        let written =
            tokio::task::spawn_blocking(move || persist_record(&path, &updated).map(|()| updated))
                .await;
        match written {
            Ok(Ok(record)) => lock(&self.history).commit(record),
            Ok(Err(e)) => error!(error = %e, "Failed to record boot duration"),
            Err(e) => error!(error = %e, "Boot history write task failed"),
        }
    }

    /// Reap a child that is already on its way out, off the caller's path.
    fn reap_in_background(child: Child, term_grace: Duration) {
        tokio::spawn(async move {
            match reap_or_shutdown(child, EXIT_WAIT, term_grace).await {
                Ok(status) => debug!(?status, "Server process exited"),
                Err(e) => warn!(error = %e, "Failed to reap server process"),
            }
        });
    }

    /// Shutdown marker while ON: the server stopped itself.
    async fn on_in_band_shutdown(self: &Arc<Self>, generation: u64) {
        if !self.transition(ServerState::On, ServerState::Stopping) {
            return;
        }
        info!("Server shut down from inside");
        self.events.broadcast(SupervisorEvent::stopping());

        let child = self.take_child();
        self.close_stdin().await;

        // reaping happens off the output loop so it keeps draining the pipes
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            if let Some(child) = child {
                match reap_or_shutdown(child, EXIT_WAIT, shared.term_grace).await {
                    Ok(status) => debug!(?status, "Server process exited"),
                    Err(e) => warn!(error = %e, "Failed to reap server process"),
                }
            }
            shared.end_session(generation, SessionEnd::Stopped);
            if shared.transition(ServerState::Stopping, ServerState::Off) {
                shared.events.broadcast(SupervisorEvent::stopped(true));
            }
        });
    }

    /// Output ended. Outside a stop this is a crash.
    async fn on_output_closed(&self, generation: u64) {
        self.output_closed.store(generation, Ordering::SeqCst);
        if !self.is_current(generation) {
            debug!(generation, "Output of a replaced server closed");
            return;
        }

        let state = self.state();
        if !matches!(state, ServerState::Starting | ServerState::On) {
            debug!(state = %state, "Server output closed");
            return;
        }

        let child = self.take_child();
        self.close_stdin().await;
        if let Some(child) = child {
            match reap_or_shutdown(child, EXIT_WAIT, self.term_grace).await {
                Ok(status) => debug!(?status, "Crashed server process reaped"),
                Err(e) => warn!(error = %e, "Failed to reap crashed server process"),
            }
        }

        // recorded before the state flips so boot watchers see the reason
        self.end_session(generation, SessionEnd::Crashed);
        if self.transition(state, ServerState::Off) {
            warn!(during = %state, "Server output closed unexpectedly, treating as a crash");
            self.events.broadcast(SupervisorEvent::crashed(state));
        }
    }
}

/// Consume one child's output until every pipe has closed.
async fn run_output_loop(
    shared: Arc<Shared>,
    generation: u64,
    mut writer: ArchiveWriter,
    mut lines: mpsc::Receiver<String>,
) {
    let mut archive_failed = false;

    while let Some(line) = lines.recv().await {
        trace!(target: "mcctl::server", "{line}");

        if let Err(e) = writer.append_line(&line).await {
            if !archive_failed {
                error!(archive = %writer.name(), error = %e, "Failed to append to log archive");
                archive_failed = true;
            }
        }

        if !shared.is_current(generation) {
            continue;
        }

        let marker = shared.markers.classify(&line);
        lock(&shared.tail).push(line);

        match marker {
            Some(Marker::Ready) => shared.on_ready(generation).await,
            Some(Marker::Shutdown) => shared.on_in_band_shutdown(generation).await,
            None => {}
        }
    }

    debug!(archive = %writer.name(), "Server output closed");
    shared.on_output_closed(generation).await;
}

enum ShutdownWait {
    Confirmed,
    Exited,
    Exhausted,
}

/// Owns the supervised child and everything observed about it.
///
/// Exactly one instance exists per supervised server; it is created from
/// settings by the composition root and passed to whoever needs it.
pub struct ProcessSupervisor {
    shared: Arc<Shared>,
    launch: LaunchSpec,
    commands: CommandSettings,
    timing: TimingSettings,
    page_ceiling: usize,
    access_point: Option<String>,
    /// Serializes start, stop and kill.
    ops: tokio::sync::Mutex<()>,
}

impl ProcessSupervisor {
    /// Build a supervisor, loading boot history from the configured file.
    pub fn from_settings(settings: &SupervisorSettings) -> Result<Self, SupervisorError> {
        let history = BootHistoryStore::load(settings.history_path(), &settings.modpack_name)?;
        Ok(Self::new(settings, history))
    }

    pub fn new(settings: &SupervisorSettings, history: BootHistoryStore) -> Self {
        let shared = Shared {
            state: Mutex::new(ServerState::Off),
            tail: Mutex::new(LogTailBuffer::new(settings.tail_capacity)),
            child: Mutex::new(None),
            stdin: tokio::sync::Mutex::new(None),
            session: Mutex::new(None),
            generation: AtomicU64::new(0),
            output_closed: AtomicU64::new(0),
            history: Mutex::new(history),
            archive: LogArchive::new(&settings.logs_dir),
            markers: MarkerSet::from_settings(&settings.markers),
            events: EventBroadcaster::new(),
            term_grace: DEFAULT_TERM_GRACE,
        };
        Self {
            shared: Arc::new(shared),
            launch: LaunchSpec::from_settings(settings),
            commands: settings.commands.clone(),
            timing: settings.timing.clone(),
            page_ceiling: settings.page_ceiling,
            access_point: None,
            ops: tokio::sync::Mutex::new(()),
        }
    }

    /// Access point shown once a boot completes.
    #[must_use]
    pub fn with_access_point(mut self, access_point: impl Into<String>) -> Self {
        self.access_point = Some(access_point.into());
        self
    }

    pub fn access_point(&self) -> Option<&str> {
        self.access_point.as_deref()
    }

    pub fn state(&self) -> ServerState {
        self.shared.state()
    }

    /// Lifecycle events from this supervisor.
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.shared.events.subscribe()
    }

    pub fn history(&self) -> BootRecord {
        lock(&self.shared.history).record().clone()
    }

    pub fn status(&self) -> SupervisorStatus {
        let session = self.shared.session();
        let state = self.state();
        let history = lock(&self.shared.history);
        SupervisorStatus {
            state,
            archive: self.shared.archive.active(),
            uptime: session
                .as_ref()
                .filter(|_| state.is_active())
                .map(|s| s.started_at.elapsed()),
            boot: session
                .as_ref()
                .filter(|_| state.is_active())
                .and_then(|s| s.boot_duration),
            average_boot_secs: history.average(),
            recorded_boots: history.record().len(),
        }
    }

    /// Spawn the server and return without waiting for it to boot.
    ///
    /// A second call while a child is held spawns nothing and reports
    /// [`StartOutcome::AlreadyRunning`]. Archive and spawn failures leave
    /// the state OFF.
    pub async fn start(&self) -> Result<StartOutcome, SupervisorError> {
        let _op = self.ops.lock().await;

        let state = self.state();
        if state != ServerState::Off || self.shared.has_child() {
            info!(state = %state, "Start ignored, server already running");
            return Ok(StartOutcome::AlreadyRunning(state));
        }

        let mut writer = self.shared.archive.create(&Local::now())?;
        let archive = writer.name().to_string();
        info!(archive = %archive, command = %self.launch.display(), "Starting server");

        let mut child = match self.launch.command().spawn() {
            Ok(child) => child,
            Err(source) => {
                let command = self.launch.display();
                error!(command = %command, error = %source, "Failed to spawn server");
                let _ = writer
                    .append_line(&format!("mcctl: failed to spawn `{command}`: {source}"))
                    .await;
                return Err(SupervisorError::Spawn { command, source });
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdin = child.stdin.take();

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let prior_average = lock(&self.shared.history).average();
        lock(&self.shared.tail).clear();
        *lock(&self.shared.session) = Some(BootSession {
            generation,
            started_at: Instant::now(),
            archive: archive.clone(),
            prior_average,
            boot_duration: None,
            end: None,
            timeout_reported: false,
        });
        *lock(&self.shared.child) = Some(child);
        *self.shared.stdin.lock().await = stdin;
        self.shared
            .transition(ServerState::Off, ServerState::Starting);
        self.shared
            .events
            .broadcast(SupervisorEvent::starting(archive.clone()));

        let (tx, rx) = mpsc::channel(OUTPUT_CHANNEL_CAPACITY);
        if let Some(stdout) = stdout {
            spawn_stream_reader(stdout, StreamKind::Stdout, tx.clone());
        }
        if let Some(stderr) = stderr {
            spawn_stream_reader(stderr, StreamKind::Stderr, tx);
        }
        tokio::spawn(run_output_loop(
            Arc::clone(&self.shared),
            generation,
            writer,
            rx,
        ));

        Ok(StartOutcome::Started { archive })
    }

    /// Push boot progress to `sink` once per tick until the boot resolves.
    ///
    /// Returns [`BootOutcome::TimedOut`] once the boot deadline passes; the
    /// process is left running in STARTING for the operator to decide.
    pub async fn watch_boot(&self, sink: &dyn ProgressSink) -> Result<BootOutcome, SupervisorError> {
        let generation = self
            .shared
            .session()
            .map(|s| s.generation)
            .ok_or(SupervisorError::NotRunning)?;

        let mut ticker = tokio::time::interval(self.timing.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(session) = self
                .shared
                .session()
                .filter(|s| s.generation == generation)
            else {
                return Ok(BootOutcome::Stopped);
            };
            let state = self.state();
            let elapsed = session.started_at.elapsed();

            if let Some(boot) = session.boot_duration {
                let mut snapshot =
                    ProgressEstimator::estimate(boot, session.prior_average, ServerState::On);
                if let Some(access_point) = &self.access_point {
                    snapshot = snapshot.with_access_point(access_point.clone());
                }
                sink.update(&ProgressUpdate::Boot(snapshot));
                return Ok(BootOutcome::Online { boot });
            }

            match (session.end, state) {
                (Some(SessionEnd::Crashed), _) => {
                    sink.update(&ProgressUpdate::BootFailed {
                        reason: BootFailure::Crashed,
                        elapsed,
                    });
                    return Ok(BootOutcome::Crashed { elapsed });
                }
                (None, ServerState::Starting) => {
                    if elapsed >= self.timing.boot_timeout() {
                        self.report_boot_timeout(&session, elapsed);
                        sink.update(&ProgressUpdate::BootFailed {
                            reason: BootFailure::TimedOut,
                            elapsed,
                        });
                        return Ok(BootOutcome::TimedOut { elapsed });
                    }
                    let snapshot = ProgressEstimator::estimate(
                        elapsed,
                        session.prior_average,
                        ServerState::Starting,
                    );
                    sink.update(&ProgressUpdate::Boot(snapshot));
                }
                // boot duration lands right after the state flips
                (None, ServerState::On) => {}
                _ => {
                    sink.update(&ProgressUpdate::BootFailed {
                        reason: BootFailure::Abandoned,
                        elapsed,
                    });
                    return Ok(BootOutcome::Stopped);
                }
            }
        }
    }

    fn report_boot_timeout(&self, session: &BootSession, elapsed: Duration) {
        if session.timeout_reported {
            return;
        }
        self.shared.update_session(session.generation, |s| {
            s.timeout_reported = true;
        });
        warn!(
            elapsed_secs = elapsed.as_secs_f64(),
            "Server did not come online before the boot deadline"
        );
        self.shared
            .events
            .broadcast(SupervisorEvent::boot_timed_out(elapsed.as_secs_f64()));
    }

    /// Ask the server to stop and wait for it to confirm.
    ///
    /// Polls the tail for the shutdown marker among lines that arrived
    /// after the stop command. Ends early if output closes. A confirmed stop
    /// returns right away; the exiting process is reaped in the background.
    /// When the polls run out the process is terminated. The child handle is
    /// released exactly once and the state ends OFF.
    pub async fn stop(&self, sink: &dyn ProgressSink) -> Result<StopOutcome, SupervisorError> {
        let _op = self.ops.lock().await;

        if !self.shared.has_child() {
            return Err(SupervisorError::NotRunning);
        }
        if !self
            .shared
            .transition(ServerState::On, ServerState::Stopping)
        {
            let state = self.state();
            return Err(if state == ServerState::Off {
                SupervisorError::NotRunning
            } else {
                SupervisorError::InvalidState {
                    operation: "stop",
                    state,
                }
            });
        }

        let generation = self.shared.generation.load(Ordering::SeqCst);
        info!("Stopping server");
        self.shared.events.broadcast(SupervisorEvent::stopping());
        sink.update(&ProgressUpdate::Stop(StopStage::Requested));

        let mark = lock(&self.shared.tail).next_seq();
        let wait = match self.shared.send_command(&self.commands.stop).await {
            Ok(()) => self.await_shutdown(generation, mark, sink).await,
            Err(e) => {
                warn!(error = %e, "Could not send stop command, terminating server");
                ShutdownWait::Exhausted
            }
        };

        let child = self.shared.take_child();
        self.shared.close_stdin().await;

        let outcome = match (child, wait) {
            (Some(child), ShutdownWait::Exhausted) => {
                warn!(
                    polls = self.timing.stop_max_polls,
                    "Shutdown was not confirmed, terminating server"
                );
                if let Err(e) = shutdown_child(child, self.shared.term_grace).await {
                    error!(error = %e, "Failed to terminate server process");
                }
                StopOutcome::Forced
            }
            (child, wait) => {
                // confirmed or exited: the server is done, its exit is not awaited here
                if let Some(child) = child {
                    Shared::reap_in_background(child, self.shared.term_grace);
                }
                match wait {
                    ShutdownWait::Confirmed => StopOutcome::Confirmed,
                    _ => StopOutcome::Exited,
                }
            }
        };

        self.shared.end_session(generation, SessionEnd::Stopped);
        if self
            .shared
            .transition(ServerState::Stopping, ServerState::Off)
        {
            self.shared.events.broadcast(SupervisorEvent::stopped(false));
        } else {
            debug!(state = %self.state(), "State already left STOPPING");
        }

        let archive = self.shared.session().map(|s| s.archive);
        sink.update(&ProgressUpdate::Stop(StopStage::Off {
            archive,
            forced: outcome.was_forced(),
        }));
        info!(?outcome, "Server stopped");
        Ok(outcome)
    }

    async fn await_shutdown(
        &self,
        generation: u64,
        mark: u64,
        sink: &dyn ProgressSink,
    ) -> ShutdownWait {
        let max_attempts = self.timing.stop_max_polls;
        for attempt in 1..=max_attempts {
            sink.update(&ProgressUpdate::Stop(StopStage::Waiting {
                attempt,
                max_attempts,
            }));
            sleep(self.timing.stop_poll()).await;

            let confirmed = lock(&self.shared.tail)
                .find_since(mark, self.shared.markers.shutdown())
                .is_some();
            if confirmed {
                debug!(attempt, "Shutdown confirmed");
                return ShutdownWait::Confirmed;
            }
            if self.shared.output_closed.load(Ordering::SeqCst) == generation {
                debug!(attempt, "Server output closed before confirmation");
                return ShutdownWait::Exited;
            }
        }
        ShutdownWait::Exhausted
    }

    /// Terminate the child without asking it to stop.
    ///
    /// For a server stuck booting or not answering. Returns the state the
    /// server was in.
    pub async fn kill(&self) -> Result<ServerState, SupervisorError> {
        let _op = self.ops.lock().await;

        let state = self.state();
        match state {
            ServerState::Starting | ServerState::On => {}
            ServerState::Off => return Err(SupervisorError::NotRunning),
            ServerState::Stopping => {
                return Err(SupervisorError::InvalidState {
                    operation: "kill",
                    state,
                });
            }
        }

        // the output loop ignores everything from this child from here on
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst);
        let child = self.shared.take_child();
        self.shared.close_stdin().await;
        let Some(child) = child else {
            return Err(SupervisorError::NotRunning);
        };

        warn!(state = %state, "Killing server process");
        match shutdown_child(child, self.shared.term_grace).await {
            Ok(status) => info!(?status, "Server process killed"),
            Err(e) => error!(error = %e, "Failed to kill server process"),
        }

        self.shared.end_session(generation, SessionEnd::Killed);
        let previous = std::mem::replace(&mut *lock(&self.shared.state), ServerState::Off);
        info!(from = %previous, to = %ServerState::Off, "Server state changed");
        self.shared.events.broadcast(SupervisorEvent::stopped(false));
        Ok(previous)
    }

    /// Best-effort list of connected players.
    ///
    /// Sends the list command and watches the tail for a fresh reply until
    /// the configured timeout.
    pub async fn connected_players(&self) -> PlayerQuery {
        if self.state() != ServerState::On || !self.shared.has_child() {
            return PlayerQuery::NotRunning;
        }

        let mark = lock(&self.shared.tail).next_seq();
        if let Err(e) = self.shared.send_command(&self.commands.list_players).await {
            warn!(error = %e, "Failed to send players query");
            return match e {
                SupervisorError::StdinUnavailable => PlayerQuery::NotRunning,
                _ => PlayerQuery::Unknown,
            };
        }

        let deadline = Instant::now() + self.timing.players_timeout();
        sleep(self.timing.players_grace()).await;
        loop {
            let reply = lock(&self.shared.tail)
                .find_since(mark, self.shared.markers.players_online())
                .map(ConnectedPlayers::parse_reply);
            if let Some(players) = reply {
                debug!(count = players.count(), "Players query answered");
                return PlayerQuery::Online(players);
            }

            let now = Instant::now();
            if now >= deadline {
                warn!("Players query got no reply in time");
                return PlayerQuery::Unknown;
            }
            sleep(PLAYERS_POLL_INTERVAL.min(deadline - now)).await;
        }
    }

    /// Archive names, newest first.
    pub fn list_archives(&self, limit: Option<usize>) -> Result<Vec<String>, ArchiveError> {
        self.shared.archive.list(limit)
    }

    /// Archive content by name; `latest` is the current or most recent boot.
    pub fn fetch_archive(&self, name: &str) -> Result<String, ArchiveError> {
        self.shared.archive.fetch(name)
    }

    pub fn archive(&self) -> &LogArchive {
        &self.shared.archive
    }

    /// Recent output, newest first, split into pages below the size ceiling.
    pub fn live_buffer(&self) -> Vec<String> {
        lock(&self.shared.tail).paginate(self.page_ceiling)
    }

    /// Buffered lines, oldest first.
    pub fn tail_lines(&self) -> Vec<String> {
        lock(&self.shared.tail).snapshot()
    }
}

impl Drop for ProcessSupervisor {
    fn drop(&mut self) {
        if self.shared.has_child() {
            // kill_on_drop on the child takes care of the process itself
            warn!("Supervisor dropped while the server is running");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcctl_core::ports::NoopProgressSink;
    use std::path::Path;
    use tempfile::tempdir;

    fn supervisor(dir: &Path) -> ProcessSupervisor {
        let settings = SupervisorSettings {
            server_dir: dir.to_path_buf(),
            logs_dir: dir.join("logs"),
            ..Default::default()
        };
        let history = BootHistoryStore::load(dir.join("history.json"), "test").unwrap();
        ProcessSupervisor::new(&settings, history)
    }

    #[tokio::test]
    async fn test_idle_supervisor() {
        let dir = tempdir().unwrap();
        let sup = supervisor(dir.path());
        assert_eq!(sup.state(), ServerState::Off);
        assert!(sup.live_buffer().is_empty());
        assert_eq!(sup.connected_players().await, PlayerQuery::NotRunning);
        assert!(matches!(
            sup.stop(&NoopProgressSink).await,
            Err(SupervisorError::NotRunning)
        ));
        assert!(matches!(sup.kill().await, Err(SupervisorError::NotRunning)));
        assert!(matches!(
            sup.watch_boot(&NoopProgressSink).await,
            Err(SupervisorError::NotRunning)
        ));

        let status = sup.status();
        assert_eq!(status.state, ServerState::Off);
        assert_eq!(status.uptime, None);
        assert_eq!(status.recorded_boots, 0);
    }

    #[tokio::test]
    async fn test_spawn_failure_leaves_state_off() {
        let dir = tempdir().unwrap();
        let settings = SupervisorSettings {
            server_dir: dir.path().to_path_buf(),
            logs_dir: dir.path().join("logs"),
            start_command: "./does-not-exist.sh".into(),
            ..Default::default()
        };
        let history = BootHistoryStore::load(dir.path().join("h.json"), "").unwrap();
        let sup = ProcessSupervisor::new(&settings, history);

        let err = sup.start().await.unwrap_err();
        assert!(matches!(err, SupervisorError::Spawn { .. }));
        assert_eq!(sup.state(), ServerState::Off);
        assert!(!sup.shared.has_child());

        let log = sup.fetch_archive("latest").unwrap();
        assert!(log.contains("failed to spawn"));
    }

    #[tokio::test]
    async fn test_archive_failure_aborts_start() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("logs"), "file in the way").unwrap();
        let sup = supervisor(dir.path());

        let err = sup.start().await.unwrap_err();
        assert!(matches!(
            err,
            SupervisorError::Archive(ArchiveError::CreateDir { .. })
        ));
        assert_eq!(sup.state(), ServerState::Off);
    }

    #[test]
    fn test_transition_is_compare_and_set() {
        let dir = tempdir().unwrap();
        let sup = supervisor(dir.path());
        let shared = &sup.shared;
        assert!(!shared.transition(ServerState::On, ServerState::Stopping));
        assert!(shared.transition(ServerState::Off, ServerState::Starting));
        assert!(!shared.transition(ServerState::Off, ServerState::Starting));
        assert!(!shared.transition(ServerState::Starting, ServerState::Stopping));
        assert!(shared.transition(ServerState::Starting, ServerState::On));
        assert_eq!(shared.state(), ServerState::On);
    }
}
