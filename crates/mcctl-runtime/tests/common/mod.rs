//! Shared fixtures for supervisor integration tests.
//!
//! Each test writes a small `sh` script that plays the part of the game
//! server and points the supervisor at it.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use mcctl_core::events::SupervisorEvent;
use mcctl_core::ports::ProgressSink;
use mcctl_core::progress::ProgressUpdate;
use mcctl_core::settings::{SupervisorSettings, TimingSettings};
use mcctl_runtime::{BootHistoryStore, ProcessSupervisor};
use tokio::sync::broadcast;

pub const READY_LINE: &str = r#"[12:00:05] [Server thread/INFO]: Done (0.2s)! For help, type "help""#;
pub const SAVED_LINE: &str = "[12:10:00] [Server thread/INFO]: All dimensions are saved";

/// Boots after a short delay, answers `list`, honours `stop`.
pub const WELL_BEHAVED: &str = r#"
echo "[12:00:00] [main/INFO]: Starting minecraft server version 1.20.1"
echo "[12:00:00] [Server thread/INFO]: Preparing level \"world\""
sleep 0.2
echo '[12:00:05] [Server thread/INFO]: Done (0.2s)! For help, type "help"'
while IFS= read -r cmd; do
  case "$cmd" in
    list) echo "[12:05:00] [Server thread/INFO]: There are 2 of a max of 20 players online: alice, bob" ;;
    stop)
      echo "[12:10:00] [Server thread/INFO]: Stopping server"
      echo "[12:10:00] [Server thread/INFO]: All dimensions are saved"
      exit 0
      ;;
    *) echo "[12:05:00] [Server thread/INFO]: Unknown command: $cmd" ;;
  esac
done
"#;

/// Confirms `stop` half a second late, then lingers before exiting.
pub const SAVES_SLOWLY: &str = r#"
echo '[12:00:05] [Server thread/INFO]: Done (0.1s)! For help, type "help"'
while IFS= read -r cmd; do
  case "$cmd" in
    stop)
      echo "[12:10:00] [Server thread/INFO]: Stopping server"
      sleep 0.5
      echo "[12:10:01] [Server thread/INFO]: All dimensions are saved"
      sleep 5
      exit 0
      ;;
  esac
done
"#;

/// Exits before it finishes booting.
pub const CRASHES_WHILE_BOOTING: &str = r#"
echo "[12:00:00] [main/INFO]: Starting minecraft server version 1.20.1"
echo "[12:00:01] [main/ERROR]: Failed to load mod: broken.jar" >&2
exit 1
"#;

/// Boots, then shuts itself down as if an operator typed /stop in game.
pub const STOPS_ITSELF: &str = r#"
echo '[12:00:05] [Server thread/INFO]: Done (0.1s)! For help, type "help"'
sleep 0.3
echo "[12:10:00] [Server thread/INFO]: Stopping server"
echo "[12:10:00] [Server thread/INFO]: All dimensions are saved"
"#;

/// Boots and then ignores every command.
pub const IGNORES_STOP: &str = r#"
echo '[12:00:05] [Server thread/INFO]: Done (0.1s)! For help, type "help"'
while IFS= read -r cmd; do
  echo "[12:05:00] [Server thread/INFO]: Ignoring $cmd"
done
"#;

/// Never finishes booting.
pub const HANGS_WHILE_BOOTING: &str = r#"
echo "[12:00:00] [main/INFO]: Starting minecraft server version 1.20.1"
exec sleep 30
"#;

/// Settings with fast timings pointing at `script` inside `dir`.
pub fn settings_for(dir: &Path, script: &str) -> SupervisorSettings {
    fs::write(dir.join("server.sh"), script).unwrap();
    SupervisorSettings {
        server_dir: dir.to_path_buf(),
        start_command: "sh".into(),
        start_args: vec!["server.sh".into()],
        logs_dir: dir.join("logs"),
        history_file: Some(dir.join("history.json")),
        timing: TimingSettings {
            tick_ms: 20,
            stop_poll_ms: 50,
            stop_max_polls: 40,
            players_grace_ms: 20,
            players_timeout_ms: 2000,
            boot_timeout_secs: 10,
        },
        ..Default::default()
    }
}

pub fn supervisor(settings: &SupervisorSettings) -> ProcessSupervisor {
    let history = BootHistoryStore::load(settings.history_path(), "test pack").unwrap();
    ProcessSupervisor::new(settings, history)
}

/// Next event, failing the test if none arrives in time.
pub async fn next_event(rx: &mut broadcast::Receiver<SupervisorEvent>) -> SupervisorEvent {
    tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("timed out waiting for supervisor event")
        .expect("event channel closed")
}

/// Sink that keeps every update.
#[derive(Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingSink {
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn update(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}
