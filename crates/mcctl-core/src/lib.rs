//! Core domain types, settings and ports for the mcctl server supervisor.
//!
//! This crate has no process or network dependencies. The runtime crate
//! implements the supervisor on top of these types and adapters (the CLI)
//! render them.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod panel;
pub mod paths;
pub mod ports;
pub mod progress;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    BootRecord, ConnectedPlayers, PlayerQuery, RestartTicket, ServerProperties, ServerState,
    TicketTarget,
};
pub use events::SupervisorEvent;
pub use panel::Panel;
pub use paths::{ConfigError, ConfigSource, LoadedSettings, load_settings, load_settings_with};
pub use ports::{
    ArchiveError, HistoryError, NoopProgressSink, ProgressSink, SupervisorError, TicketError,
};
pub use progress::{
    BootFailure, ProgressEstimator, ProgressSnapshot, ProgressUpdate, StopStage, format_duration,
    format_seconds,
};
pub use settings::{
    AccessPointSetting, CommandSettings, MarkerSettings, SettingsError, SupervisorSettings,
    TimingSettings, validate_settings,
};
