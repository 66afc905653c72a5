//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Logging (tracing subscriber with an env filter)
//! - Settings (`.env`, TOML file, `MCCTL_*` overrides)
//! - The process supervisor with its boot history and log archive
//! - The access point and restart ticket file
//!
//! Command handlers receive the composed [`CliContext`].

use std::path::Path;
use std::sync::Arc;

use mcctl_core::{LoadedSettings, ServerProperties, SupervisorSettings, load_settings};
use mcctl_runtime::{
    ProcessSupervisor, RestartTicketFile, read_server_properties, resolve_access_point,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::CliError;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins unless `verbose` forces debug output. Logs go to stderr
/// so they do not interleave with panels printed to stdout.
pub fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .ok();
}

/// Load `.env`, then the config file and environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedSettings, CliError> {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let loaded = load_settings(explicit)?;
    match &loaded.path {
        Some(path) => info!(path = %path.display(), source = ?loaded.source, "Loaded settings"),
        None => info!("No config file found, using defaults"),
    }
    Ok(loaded)
}

/// Fully composed context for the console.
pub struct CliContext {
    pub settings: SupervisorSettings,
    pub supervisor: Arc<ProcessSupervisor>,
    /// `server.properties` as read at start-up.
    pub properties: Option<ServerProperties>,
    pub tickets: RestartTicketFile,
}

impl CliContext {
    pub fn supervisor(&self) -> &Arc<ProcessSupervisor> {
        &self.supervisor
    }

    /// Access point the players connect to.
    pub fn access_point(&self) -> &str {
        self.supervisor.access_point().unwrap_or_default()
    }
}

/// Build the supervisor and its collaborators from loaded settings.
pub async fn bootstrap(settings: SupervisorSettings) -> Result<CliContext, CliError> {
    let properties = match read_server_properties(&settings.server_dir) {
        Ok(properties) => properties,
        Err(e) => {
            warn!(error = %e, "Could not read server.properties");
            None
        }
    };

    let access_point =
        resolve_access_point(&settings.access_point_setting(), properties.as_ref()).await;
    info!(access_point = %access_point, "Resolved access point");

    let supervisor = ProcessSupervisor::from_settings(&settings)?.with_access_point(access_point);
    let tickets = RestartTicketFile::new(settings.restart_ticket_file.clone());

    Ok(CliContext {
        settings,
        supervisor: Arc::new(supervisor),
        properties,
        tickets,
    })
}
