//! Console tests against a scripted server child.
#![cfg(unix)]

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::ProgressDrawTarget;
use mcctl_cli::bootstrap;
use mcctl_cli::handlers::console::{Console, Flow};
use mcctl_cli::presentation::TerminalSink;
use mcctl_core::{RestartTicket, ServerState, SupervisorSettings, TicketTarget, TimingSettings};
use tempfile::tempdir;

const SERVER: &str = r#"
echo "[12:00:00] [main/INFO]: Starting minecraft server version 1.20.1"
sleep 0.1
echo '[12:00:05] [Server thread/INFO]: Done (0.1s)! For help, type "help"'
while IFS= read -r cmd; do
  case "$cmd" in
    list) echo "[12:05:00] [Server thread/INFO]: There are 2 of a max of 20 players online: alice, bob" ;;
    stop)
      echo "[12:10:00] [Server thread/INFO]: All dimensions are saved"
      exit 0
      ;;
  esac
done
"#;

const STUCK: &str = r#"
echo "[12:00:00] [main/INFO]: Starting minecraft server version 1.20.1"
exec sleep 30
"#;

#[derive(Clone, Default)]
struct Output(Arc<Mutex<Vec<u8>>>);

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Output {
    fn take(&self) -> String {
        String::from_utf8(std::mem::take(&mut *self.0.lock().unwrap())).unwrap()
    }

    async fn wait_for(&self, needle: &str) -> String {
        let mut seen = String::new();
        for _ in 0..200 {
            seen.push_str(&self.take());
            if seen.contains(needle) {
                return seen;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("`{needle}` never printed, got:\n{seen}");
    }
}

fn settings(dir: &Path, script: &str) -> SupervisorSettings {
    fs::write(dir.join("server.sh"), script).unwrap();
    fs::write(
        dir.join("server.properties"),
        "difficulty=hard\ngamemode=survival\nquery.port=25570\n",
    )
    .unwrap();
    SupervisorSettings {
        server_dir: dir.to_path_buf(),
        start_command: "sh".into(),
        start_args: vec!["server.sh".into()],
        logs_dir: dir.join("logs"),
        restart_ticket_file: dir.join("restart_ticket.json"),
        access_point: "play.example.net:25570".into(),
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

async fn console(settings: SupervisorSettings) -> (Console, Output) {
    let ctx = bootstrap(settings).await.unwrap();
    let output = Output::default();
    let sink = TerminalSink::with_output(ProgressDrawTarget::hidden, Box::new(output.clone()));
    (Console::new(ctx, Arc::new(sink)), output)
}

#[tokio::test]
async fn operator_session() {
    let dir = tempdir().unwrap();
    let (mut console, out) = console(settings(dir.path(), SERVER)).await;
    assert!(console.context().properties.is_some());
    assert_eq!(console.context().access_point(), "play.example.net:25570");

    assert_eq!(console.handle_line("start").await, Flow::Continue);
    let text = out.wait_for("Server is Online").await;
    assert!(text.contains("Requesting the server controller to boot up the server"));
    assert!(text.contains("Server is online at: play.example.net:25570"));

    console.handle_line("start").await;
    assert!(out.take().contains("already online at: play.example.net:25570"));

    console.handle_line("status").await;
    let text = out.take();
    assert!(text.contains("Number of players online: 2"), "{text}");
    assert!(text.contains("Players online: alice, bob"));
    assert!(text.contains("World: difficulty hard, gamemode survival"));

    console.handle_line("live").await;
    let text = out.take();
    assert!(text.contains("Page 1 of 1"));
    assert!(text.contains("players online: alice, bob"));

    console.handle_line("get-log latest").await;
    assert!(out.take().contains("Done (0.1s)!"));

    console.handle_line("get-log nope.log").await;
    let text = out.take();
    assert!(text.contains("Requested file was not found."));
    assert!(text.contains("If you want the most recent logs, the filename is"));

    console.handle_line("list-logs 1").await;
    assert!(out.take().contains("Existing Logs"));

    console.handle_line("stop").await;
    assert!(out.take().contains("You can find this session's logs at:"));
    assert_eq!(console.context().supervisor.state(), ServerState::Off);

    console.handle_line("stop").await;
    assert!(out.take().contains("The server is already off."));

    assert_eq!(console.handle_line("quit").await, Flow::Quit);
}

#[tokio::test]
async fn stuck_boot_is_refused_stop_and_killed_on_quit() {
    let dir = tempdir().unwrap();
    let (mut console, out) = console(settings(dir.path(), STUCK)).await;

    console.handle_line("start").await;
    console.handle_line("stop").await;
    assert!(out.wait_for("Wait until the server is on").await.contains("[kill]"));

    console.handle_line("start").await;
    assert!(out.take().contains("already starting up, syncing progress"));

    assert_eq!(console.handle_line("quit").await, Flow::Quit);
    assert_eq!(console.context().supervisor.state(), ServerState::Off);
    assert!(out.take().contains("terminated while starting"));
}

#[tokio::test]
async fn restart_ticket_is_announced_once() {
    let dir = tempdir().unwrap();
    let settings = settings(dir.path(), SERVER);
    let ticket_path = settings.restart_ticket_file.clone();
    let (console, out) = console(settings).await;

    let ticket = RestartTicket::new(TicketTarget::Channel("ops".into()), "m-42");
    console.context().tickets.write(&ticket).unwrap();
    assert!(ticket_path.exists());

    console.announce_restart();
    let text = out.take();
    assert!(text.contains("Host Restarted"));
    assert!(text.contains("Requested by: ops"));
    assert!(!ticket_path.exists());

    console.announce_restart();
    assert!(out.take().is_empty());
}

#[tokio::test]
async fn misc_commands() {
    let dir = tempdir().unwrap();
    let (mut console, out) = console(settings(dir.path(), SERVER)).await;

    console.handle_line("reboot").await;
    assert!(out.take().contains("No reboot command is configured."));

    console.handle_line("frobnicate").await;
    assert!(out.take().contains("Unknown command `frobnicate`"));

    console.handle_line("live").await;
    assert!(out.take().contains("No output captured yet."));

    console.handle_line("list-logs").await;
    assert!(out.take().contains("No logs yet."));

    console.handle_line("help").await;
    assert!(out.take().contains("get-log <name>"));

    assert_eq!(console.handle_line("   ").await, Flow::Continue);
    assert_eq!(console.handle_line("quit").await, Flow::Quit);
}
