//! Settings domain types and validation.
//!
//! These are pure domain types; loading from disk lives in [`crate::paths`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default capacity of the in-memory tail buffer.
pub const DEFAULT_TAIL_CAPACITY: usize = 30;

/// Default character ceiling for one rendered page of live output.
pub const DEFAULT_PAGE_CEILING: usize = 2000;

/// Access point value that requests public IP auto-detection.
pub const ACCESS_POINT_AUTO: &str = "auto";

const HISTORY_FILE_NAME: &str = "mcctl_boot_history.json";

/// Output substrings the supervisor reacts to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkerSettings {
    /// Seen once the server has finished booting.
    pub ready: String,
    /// Seen once a clean shutdown has completed.
    pub shutdown: String,
    /// Present in the reply to the list-players command.
    pub players_online: String,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            ready: "Done (".to_string(),
            shutdown: "All dimensions are saved".to_string(),
            players_online: "players online".to_string(),
        }
    }
}

/// Console commands written to the server's stdin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CommandSettings {
    pub stop: String,
    pub list_players: String,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            stop: "stop".to_string(),
            list_players: "list".to_string(),
        }
    }
}

/// Polling cadences and deadlines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingSettings {
    /// Boot progress tick.
    pub tick_ms: u64,
    /// Interval between stop-confirmation polls.
    pub stop_poll_ms: u64,
    /// Polls before a stop escalates to a forced kill.
    pub stop_max_polls: u32,
    /// Wait after sending the list command before the first scan.
    pub players_grace_ms: u64,
    /// Give up on the list reply after this long.
    pub players_timeout_ms: u64,
    /// Boot watch deadline.
    pub boot_timeout_secs: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            stop_poll_ms: 2000,
            stop_max_polls: 30,
            players_grace_ms: 250,
            players_timeout_ms: 2000,
            boot_timeout_secs: 900,
        }
    }
}

impl TimingSettings {
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub const fn stop_poll(&self) -> Duration {
        Duration::from_millis(self.stop_poll_ms)
    }

    pub const fn players_grace(&self) -> Duration {
        Duration::from_millis(self.players_grace_ms)
    }

    pub const fn players_timeout(&self) -> Duration {
        Duration::from_millis(self.players_timeout_ms)
    }

    pub const fn boot_timeout(&self) -> Duration {
        Duration::from_secs(self.boot_timeout_secs)
    }
}

/// How the public access point is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPointSetting {
    /// Detect the public IPv4 address and append the query port.
    Auto,
    /// Use this string verbatim.
    Fixed(String),
}

/// Supervisor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SupervisorSettings {
    /// Working directory of the server process.
    pub server_dir: PathBuf,
    /// Program that starts the server.
    pub start_command: String,
    /// Arguments; `{min_memory}` and `{max_memory}` are substituted.
    pub start_args: Vec<String>,
    /// Passed through to the child, never interpreted.
    pub min_memory: Option<String>,
    /// Passed through to the child, never interpreted.
    pub max_memory: Option<String>,
    /// Directory holding one archive file per boot.
    pub logs_dir: PathBuf,
    /// Boot history file; defaults to a file inside `server_dir`.
    pub history_file: Option<PathBuf>,
    pub restart_ticket_file: PathBuf,
    pub modpack_name: String,
    pub markers: MarkerSettings,
    pub commands: CommandSettings,
    pub timing: TimingSettings,
    pub tail_capacity: usize,
    pub page_ceiling: usize,
    /// `auto` or a literal `host:port`.
    pub access_point: String,
    /// Program and arguments that reboot the host.
    pub reboot_command: Option<Vec<String>>,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            server_dir: PathBuf::from("."),
            start_command: "./run.sh".to_string(),
            start_args: Vec::new(),
            min_memory: None,
            max_memory: None,
            logs_dir: PathBuf::from("logs"),
            history_file: None,
            restart_ticket_file: PathBuf::from("restart_ticket.json"),
            modpack_name: String::new(),
            markers: MarkerSettings::default(),
            commands: CommandSettings::default(),
            timing: TimingSettings::default(),
            tail_capacity: DEFAULT_TAIL_CAPACITY,
            page_ceiling: DEFAULT_PAGE_CEILING,
            access_point: ACCESS_POINT_AUTO.to_string(),
            reboot_command: None,
        }
    }
}

impl SupervisorSettings {
    /// Effective boot history path.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| self.server_dir.join(HISTORY_FILE_NAME))
    }

    /// Parsed access point setting.
    pub fn access_point_setting(&self) -> AccessPointSetting {
        let trimmed = self.access_point.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ACCESS_POINT_AUTO) {
            AccessPointSetting::Auto
        } else {
            AccessPointSetting::Fixed(trimmed.to_string())
        }
    }

    /// Start arguments with memory placeholders substituted.
    pub fn resolved_start_args(&self) -> Vec<String> {
        let min = self.min_memory.as_deref().unwrap_or_default();
        let max = self.max_memory.as_deref().unwrap_or_default();
        self.start_args
            .iter()
            .map(|arg| arg.replace("{min_memory}", min).replace("{max_memory}", max))
            .collect()
    }

    /// Resolve every relative path against `base`.
    pub fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.server_dir,
            &mut self.logs_dir,
            &mut self.restart_ticket_file,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        if let Some(history) = self.history_file.as_mut()
            && history.is_relative()
        {
            *history = base.join(&*history);
        }
    }

    /// Apply `MCCTL_*` overrides from a variable lookup.
    ///
    /// Takes a lookup function so callers can pass `std::env::var` in
    /// production and a map in tests.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("MCCTL_SERVER_DIR") {
            self.server_dir = PathBuf::from(dir);
        }
        if let Some(command) = lookup("MCCTL_START_COMMAND") {
            self.start_command = command;
        }
        if let Some(dir) = lookup("MCCTL_LOGS_DIR") {
            self.logs_dir = PathBuf::from(dir);
        }
        if let Some(access) = lookup("MCCTL_ACCESS_POINT") {
            self.access_point = access;
        }
        if let Some(marker) = lookup("MCCTL_READY_MARKER") {
            self.markers.ready = marker;
        }
        if let Some(marker) = lookup("MCCTL_SHUTDOWN_MARKER") {
            self.markers.shutdown = marker;
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Marker `{0}` cannot be empty")]
    EmptyMarker(&'static str),

    #[error("Start command cannot be empty")]
    EmptyStartCommand,

    #[error("Tail capacity must be at least 1")]
    ZeroTailCapacity,

    #[error("Page ceiling must be at least 200 characters, got {0}")]
    PageCeilingTooSmall(usize),

    #[error("Timing value `{0}` must be greater than zero")]
    ZeroTiming(&'static str),

    #[error("Players grace period ({grace_ms}ms) exceeds its timeout ({timeout_ms}ms)")]
    GraceExceedsTimeout { grace_ms: u64, timeout_ms: u64 },

    #[error("Reboot command cannot be empty")]
    EmptyRebootCommand,
}

/// Validate settings values.
pub fn validate_settings(settings: &SupervisorSettings) -> Result<(), SettingsError> {
    let markers = &settings.markers;
    for (name, value) in [
        ("ready", &markers.ready),
        ("shutdown", &markers.shutdown),
        ("players_online", &markers.players_online),
    ] {
        if value.trim().is_empty() {
            return Err(SettingsError::EmptyMarker(name));
        }
    }

    if settings.start_command.trim().is_empty() {
        return Err(SettingsError::EmptyStartCommand);
    }

    if settings.tail_capacity == 0 {
        return Err(SettingsError::ZeroTailCapacity);
    }

    if settings.page_ceiling < 200 {
        return Err(SettingsError::PageCeilingTooSmall(settings.page_ceiling));
    }

    let timing = &settings.timing;
    for (name, value) in [
        ("tick_ms", timing.tick_ms),
        ("stop_poll_ms", timing.stop_poll_ms),
        ("stop_max_polls", u64::from(timing.stop_max_polls)),
        ("players_timeout_ms", timing.players_timeout_ms),
        ("boot_timeout_secs", timing.boot_timeout_secs),
    ] {
        if value == 0 {
            return Err(SettingsError::ZeroTiming(name));
        }
    }

    if timing.players_grace_ms > timing.players_timeout_ms {
        return Err(SettingsError::GraceExceedsTimeout {
            grace_ms: timing.players_grace_ms,
            timeout_ms: timing.players_timeout_ms,
        });
    }

    if settings
        .reboot_command
        .as_ref()
        .is_some_and(|cmd| cmd.first().is_none_or(|program| program.trim().is_empty()))
    {
        return Err(SettingsError::EmptyRebootCommand);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = SupervisorSettings::default();
        assert_eq!(settings.tail_capacity, 30);
        assert_eq!(settings.page_ceiling, 2000);
        assert_eq!(settings.timing.tick(), Duration::from_secs(1));
        assert_eq!(settings.timing.stop_poll(), Duration::from_secs(2));
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_history_path_defaults_into_server_dir() {
        let settings = SupervisorSettings {
            server_dir: PathBuf::from("/srv/mc"),
            ..Default::default()
        };
        assert_eq!(
            settings.history_path(),
            PathBuf::from("/srv/mc/mcctl_boot_history.json")
        );
    }

    #[test]
    fn test_access_point_setting() {
        let mut settings = SupervisorSettings::default();
        assert_eq!(settings.access_point_setting(), AccessPointSetting::Auto);
        settings.access_point = " play.example.net:25565 ".into();
        assert_eq!(
            settings.access_point_setting(),
            AccessPointSetting::Fixed("play.example.net:25565".into())
        );
    }

    #[test]
    fn test_memory_placeholders_are_substituted() {
        let settings = SupervisorSettings {
            start_args: vec![
                "-Xms{min_memory}".into(),
                "-Xmx{max_memory}".into(),
                "-jar".into(),
            ],
            min_memory: Some("2G".into()),
            max_memory: Some("8G".into()),
            ..Default::default()
        };
        assert_eq!(settings.resolved_start_args(), vec!["-Xms2G", "-Xmx8G", "-jar"]);
    }

    #[test]
    fn test_rebase_keeps_absolute_paths() {
        let mut settings = SupervisorSettings {
            server_dir: PathBuf::from("/srv/mc"),
            history_file: Some(PathBuf::from("history.json")),
            ..Default::default()
        };
        settings.rebase(Path::new("/etc/mcctl"));
        assert_eq!(settings.server_dir, PathBuf::from("/srv/mc"));
        assert_eq!(settings.logs_dir, PathBuf::from("/etc/mcctl/logs"));
        assert_eq!(
            settings.history_file,
            Some(PathBuf::from("/etc/mcctl/history.json"))
        );
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MCCTL_SERVER_DIR", "/data/server"),
            ("MCCTL_READY_MARKER", "Server started"),
        ]
        .into_iter()
        .collect();
        let mut settings = SupervisorSettings::default();
        settings.apply_overrides(|key| vars.get(key).map(ToString::to_string));
        assert_eq!(settings.server_dir, PathBuf::from("/data/server"));
        assert_eq!(settings.markers.ready, "Server started");
        assert_eq!(settings.markers.shutdown, "All dimensions are saved");
    }

    #[test]
    fn test_validate_empty_marker() {
        let mut settings = SupervisorSettings::default();
        settings.markers.shutdown = "  ".into();
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyMarker("shutdown"))
        );
    }

    #[test]
    fn test_validate_zero_timing() {
        let mut settings = SupervisorSettings::default();
        settings.timing.stop_max_polls = 0;
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::ZeroTiming("stop_max_polls"))
        );
    }

    #[test]
    fn test_validate_grace_exceeds_timeout() {
        let mut settings = SupervisorSettings::default();
        settings.timing.players_grace_ms = 5000;
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::GraceExceedsTimeout { .. })
        ));
    }

    #[test]
    fn test_validate_small_page_ceiling() {
        let settings = SupervisorSettings {
            page_ceiling: 50,
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::PageCeilingTooSmall(50))
        );
    }

    #[test]
    fn test_validate_empty_reboot_command() {
        let settings = SupervisorSettings {
            reboot_command: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::EmptyRebootCommand)
        );
    }
}
