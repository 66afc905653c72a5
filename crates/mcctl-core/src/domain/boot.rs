//! Persisted boot-time history.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Observed boot durations for one modpack.
///
/// Serialized as `{"modpackName": "...", "bootDurations": [..]}`. The
/// snake-case keys written by older controllers are accepted on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootRecord {
    /// Opaque modpack identifier.
    #[serde(default, alias = "modpack_name")]
    pub modpack_name: String,
    /// Boot durations in seconds, oldest first.
    #[serde(default, alias = "boot_times")]
    pub boot_durations: Vec<f64>,
}

impl BootRecord {
    /// Create an empty record for a modpack.
    pub fn new(modpack_name: impl Into<String>) -> Self {
        Self {
            modpack_name: modpack_name.into(),
            boot_durations: Vec::new(),
        }
    }

    /// Append one observed boot.
    pub fn push(&mut self, duration: Duration) {
        self.boot_durations.push(duration.as_secs_f64());
    }

    /// Arithmetic mean over every recorded boot, `None` when empty.
    pub fn average(&self) -> Option<f64> {
        if self.boot_durations.is_empty() {
            return None;
        }
        let total: f64 = self.boot_durations.iter().sum();
        Some(total / self.boot_durations.len() as f64)
    }

    /// Number of recorded boots.
    pub fn len(&self) -> usize {
        self.boot_durations.len()
    }

    /// Whether no boot has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.boot_durations.is_empty()
    }
}
