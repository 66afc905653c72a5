//! Fire-and-forget host reboot.

use std::io;
use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

/// Spawn the configured reboot command without waiting for it.
///
/// `command` is the program followed by its arguments.
pub fn request_reboot(command: &[String]) -> io::Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty reboot command"))?;

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    info!(program = %program, pid = ?child.id(), "Requested host reboot");
    Ok(())
}
