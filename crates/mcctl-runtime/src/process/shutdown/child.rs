//! Shutdown of a `tokio::process::Child` with SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time::timeout;
use tracing::{debug, warn};

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Grace period between SIGTERM and SIGKILL.
pub const DEFAULT_TERM_GRACE: Duration = Duration::from_secs(5);

/// Terminate a child, escalating to SIGKILL if it ignores SIGTERM.
///
/// # Strategy
/// 1. Send SIGTERM and wait up to `grace` for exit
/// 2. If still running, send SIGKILL
/// 3. Wait for reaping (required to avoid zombies)
///
/// Off Unix there is no SIGTERM equivalent and the child is killed at once.
pub async fn shutdown_child(mut child: Child, grace: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        shutdown_unix(&mut child, grace).await
    }

    #[cfg(not(unix))]
    {
        let _ = grace;
        child.kill().await?;
        child.wait().await
    }
}

/// Wait up to `wait` for a child that is expected to exit on its own, then
/// fall back to [`shutdown_child`].
pub async fn reap_or_shutdown(
    mut child: Child,
    wait: Duration,
    grace: Duration,
) -> io::Result<ExitStatus> {
    match timeout(wait, child.wait()).await {
        Ok(result) => result,
        Err(_) => {
            warn!(pid = ?child.id(), "Server did not exit after shutdown, terminating");
            shutdown_child(child, grace).await
        }
    }
}

#[cfg(unix)]
async fn shutdown_unix(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    let Some(pid) = child.id() else {
        // already reaped
        return child.wait().await;
    };
    let raw_pid = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PID out of range"))?;

    if let Err(e) = signal_tree(raw_pid, Signal::SIGTERM) {
        if e == nix::errno::Errno::ESRCH {
            return child.wait().await;
        }
        return Err(io::Error::other(e));
    }

    if let Ok(result) = timeout(grace, child.wait()).await {
        return result;
    }

    debug!(pid, "SIGTERM grace expired, sending SIGKILL");
    let _ = signal_tree(raw_pid, Signal::SIGKILL);
    child.kill().await?;
    child.wait().await
}

/// Signal the process group led by `pid`, or just `pid` if it leads none.
///
/// Start scripts usually fork the JVM, so signalling only the script would
/// leave the server running with our pipes open.
#[cfg(unix)]
fn signal_tree(pid: i32, sig: Signal) -> nix::Result<()> {
    match signal::killpg(Pid::from_raw(pid), sig) {
        Err(nix::errno::Errno::ESRCH | nix::errno::Errno::EPERM) => {
            signal::kill(Pid::from_raw(pid), sig)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;
    use tokio::time::sleep;

    #[tokio::test]
    #[cfg(unix)]
    async fn shutdown_responds_to_sigterm() {
        let child = Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("failed to spawn sleep");

        let status = shutdown_child(child, DEFAULT_TERM_GRACE).await.unwrap();
        assert!(!status.success());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn shutdown_escalates_when_sigterm_is_ignored() {
        let child = Command::new("sh")
            .args(["-c", "trap '' TERM; sleep 30"])
            .spawn()
            .expect("failed to spawn sh");

        // let the shell install its trap
        sleep(Duration::from_millis(200)).await;
        let result = shutdown_child(child, Duration::from_millis(200)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn shutdown_handles_already_exited() {
        let child = Command::new("echo")
            .arg("test")
            .spawn()
            .expect("failed to spawn echo");

        sleep(Duration::from_millis(100)).await;

        let result = shutdown_child(child, DEFAULT_TERM_GRACE).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn reap_waits_for_natural_exit() {
        let child = Command::new("sh")
            .args(["-c", "sleep 0.1; exit 3"])
            .spawn()
            .expect("failed to spawn sh");

        let status = reap_or_shutdown(child, Duration::from_secs(5), DEFAULT_TERM_GRACE)
            .await
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }
}
