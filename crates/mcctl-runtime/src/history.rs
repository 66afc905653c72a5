//! Boot history persistence.
//!
//! The record lives in a small JSON file. Every write replaces the whole
//! file atomically, so a crash mid-write never truncates a valid history.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mcctl_core::domain::BootRecord;
use mcctl_core::ports::HistoryError;
use tracing::{debug, info};

use crate::persist::write_atomic;

/// File-backed store of observed boot durations.
#[derive(Debug)]
pub struct BootHistoryStore {
    path: PathBuf,
    record: BootRecord,
}

impl BootHistoryStore {
    /// Load the record at `path`, seeding and persisting an empty one if absent.
    pub fn load(path: impl Into<PathBuf>, modpack_name: &str) -> Result<Self, HistoryError> {
        let path = path.into();
        match fs::read(&path) {
            Ok(bytes) => {
                let record: BootRecord =
                    serde_json::from_slice(&bytes).map_err(|source| HistoryError::Malformed {
                        path: path.clone(),
                        source,
                    })?;
                debug!(
                    path = %path.display(),
                    boots = record.len(),
                    "Loaded boot history"
                );
                Ok(Self { path, record })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let store = Self {
                    path,
                    record: BootRecord::new(modpack_name),
                };
                store.persist(&store.record)?;
                info!(path = %store.path.display(), "Created empty boot history");
                Ok(store)
            }
            Err(source) => Err(HistoryError::Io { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn record(&self) -> &BootRecord {
        &self.record
    }

    /// Mean boot time in seconds, `None` when nothing is recorded.
    pub fn average(&self) -> Option<f64> {
        self.record.average()
    }

    /// Append a boot and persist. The in-memory record only changes once
    /// the file has been replaced.
    pub fn record_boot(&mut self, duration: Duration) -> Result<(), HistoryError> {
        let updated = self.with_boot(duration);
        persist_record(&self.path, &updated)?;
        self.commit(updated);
        Ok(())
    }

    /// The current record plus one boot, not yet persisted.
    pub fn with_boot(&self, duration: Duration) -> BootRecord {
        let mut updated = self.record.clone();
        updated.push(duration);
        updated
    }

    /// Adopt a record already written with [`persist_record`].
    pub fn commit(&mut self, record: BootRecord) {
        self.record = record;
        debug!(boots = self.record.len(), "Recorded boot duration");
    }

    fn persist(&self, record: &BootRecord) -> Result<(), HistoryError> {
        persist_record(&self.path, record)
    }
}

/// Replace the history file at `path` with `record`.
///
/// Blocking; async callers run it on the blocking pool.
pub fn persist_record(path: &Path, record: &BootRecord) -> Result<(), HistoryError> {
    let json = serde_json::to_vec_pretty(record).map_err(|source| HistoryError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, &json).map_err(|source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    })
}
