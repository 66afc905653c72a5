//! Server launch command construction.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use mcctl_core::settings::SupervisorSettings;
use tokio::process::Command;

/// Launch description derived from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl LaunchSpec {
    pub fn from_settings(settings: &SupervisorSettings) -> Self {
        let mut env = Vec::new();
        if let Some(min) = &settings.min_memory {
            env.push(("MCCTL_MIN_MEMORY".to_string(), min.clone()));
        }
        if let Some(max) = &settings.max_memory {
            env.push(("MCCTL_MAX_MEMORY".to_string(), max.clone()));
        }
        Self {
            program: resolve_program(&settings.server_dir, &settings.start_command),
            args: settings.resolved_start_args(),
            working_dir: settings.server_dir.clone(),
            env,
        }
    }

    /// Printable command line for logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Command with every stdio stream piped.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.working_dir)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // own process group so shutdown can reach whatever the script forks
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }
}

/// Relative programs with a path component (`./run.sh`) are resolved
/// against the server directory; bare names are left for `PATH` lookup.
fn resolve_program(server_dir: &Path, program: &str) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        server_dir.join(path)
    } else {
        path.to_path_buf()
    }
}
