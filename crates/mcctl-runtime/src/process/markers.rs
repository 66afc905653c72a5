//! Marker matching on server output lines.
//!
//! All substring checks against child output go through [`MarkerSet`], so
//! marker definitions can change without touching the supervisor's control
//! flow.

use mcctl_core::settings::MarkerSettings;

/// Lifecycle marker found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The server finished booting.
    Ready,
    /// The server completed a clean shutdown.
    Shutdown,
}

/// Configured marker substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    ready: String,
    shutdown: String,
    players_online: String,
}

impl MarkerSet {
    pub fn new(
        ready: impl Into<String>,
        shutdown: impl Into<String>,
        players_online: impl Into<String>,
    ) -> Self {
        Self {
            ready: ready.into(),
            shutdown: shutdown.into(),
            players_online: players_online.into(),
        }
    }

    pub fn from_settings(settings: &MarkerSettings) -> Self {
        Self::new(
            settings.ready.clone(),
            settings.shutdown.clone(),
            settings.players_online.clone(),
        )
    }

    /// Classify one output line. Readiness wins if both markers appear.
    pub fn classify(&self, line: &str) -> Option<Marker> {
        if line.contains(&self.ready) {
            Some(Marker::Ready)
        } else if line.contains(&self.shutdown) {
            Some(Marker::Shutdown)
        } else {
            None
        }
    }

    pub fn shutdown(&self) -> &str {
        &self.shutdown
    }

    pub fn players_online(&self) -> &str {
        &self.players_online
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::from_settings(&MarkerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_markers() {
        let markers = MarkerSet::default();
        assert_eq!(
            markers.classify(r#"[12:00:00] [Server thread/INFO]: Done (41.375s)! For help, type "help""#),
            Some(Marker::Ready)
        );
        assert_eq!(
            markers.classify("[12:10:00] [Server thread/INFO]: ThreadedAnvilChunkStorage: All dimensions are saved"),
            Some(Marker::Shutdown)
        );
        assert_eq!(markers.classify("[12:00:00] Preparing spawn area: 83%"), None);
    }

    #[test]
    fn test_markers_are_case_sensitive_substrings() {
        let markers = MarkerSet::new("READY", "BYE", "online");
        assert_eq!(markers.classify("server READY now"), Some(Marker::Ready));
        assert_eq!(markers.classify("server ready now"), None);
        assert_eq!(markers.classify("BYE READY"), Some(Marker::Ready));
        assert_eq!(markers.players_online(), "online");
        assert_eq!(markers.shutdown(), "BYE");
    }
}
