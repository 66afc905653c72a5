//! Per-boot log archive files.
//!
//! One file per boot in the logs directory, named after the boot's local
//! start time (`DD-MM-YYYY_HH-MM-SS.log`). Files are created exclusively and
//! only appended to while their server is live.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local, NaiveDateTime};
use mcctl_core::ports::ArchiveError;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Timestamp layout of archive file stems.
pub const ARCHIVE_NAME_FORMAT: &str = "%d-%m-%Y_%H-%M-%S";

/// Name accepted by [`LogArchive::fetch`] for the most recent archive.
pub const LATEST: &str = "latest";

const ARCHIVE_EXTENSION: &str = "log";

/// Archive file name for a boot started at `started`.
pub fn archive_name(started: &DateTime<Local>) -> String {
    format!("{}.{ARCHIVE_EXTENSION}", started.format(ARCHIVE_NAME_FORMAT))
}

/// Start time encoded in an archive file name.
pub fn parse_archive_name(name: &str) -> Option<NaiveDateTime> {
    let stem = name.strip_suffix(".log")?;
    NaiveDateTime::parse_from_str(stem, ARCHIVE_NAME_FORMAT).ok()
}

/// Directory of per-boot log files.
#[derive(Debug)]
pub struct LogArchive {
    dir: PathBuf,
    active: Mutex<Option<String>>,
}

impl LogArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            active: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Name of the archive opened by the most recent [`create`](Self::create).
    pub fn active(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Create the archive for a boot started at `started`.
    ///
    /// Fails if the directory cannot be created or the file already exists.
    pub fn create(&self, started: &DateTime<Local>) -> Result<ArchiveWriter, ArchiveError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArchiveError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let name = archive_name(started);
        let path = self.dir.join(&name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| ArchiveError::Create {
                path: path.clone(),
                source,
            })?;

        debug!(archive = %name, path = %path.display(), "Created log archive");
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(name.clone());

        Ok(ArchiveWriter {
            name,
            file: tokio::fs::File::from_std(file),
        })
    }

    /// Archive names, newest first, optionally limited to the `limit` newest.
    ///
    /// Ordering uses the start time encoded in each name; names that do not
    /// parse sort as older than every timestamped archive. A missing
    /// directory lists as empty.
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<String>, ArchiveError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
                continue;
            };
            if Path::new(&name).extension().and_then(|e| e.to_str()) == Some(ARCHIVE_EXTENSION) {
                names.push(name);
            }
        }

        names.sort_by_cached_key(|name| (parse_archive_name(name), name.clone()));
        names.reverse();
        if let Some(limit) = limit {
            names.truncate(limit);
        }
        Ok(names)
    }

    /// Full content of an archive, or of the most recent one for `latest`.
    pub fn fetch(&self, name: &str) -> Result<String, ArchiveError> {
        let name = self.resolve(name)?;
        let path = self.dir.join(&name);
        match fs::read(&path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ArchiveError::NotFound(name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Map a requested name to an archive file name inside the directory.
    pub fn resolve(&self, name: &str) -> Result<String, ArchiveError> {
        let name = name.trim();
        if name.eq_ignore_ascii_case(LATEST) {
            if let Some(active) = self.active() {
                return Ok(active);
            }
            return self
                .list(Some(1))?
                .into_iter()
                .next()
                .ok_or_else(|| ArchiveError::NotFound(LATEST.to_string()));
        }
        if name.is_empty()
            || name.contains(['/', '\\'])
            || name.contains("..")
            || Path::new(name).is_absolute()
        {
            return Err(ArchiveError::InvalidName(name.to_string()));
        }
        Ok(name.to_string())
    }
}

/// Append handle for the live archive.
#[derive(Debug)]
pub struct ArchiveWriter {
    name: String,
    file: tokio::fs::File,
}

impl ArchiveWriter {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append one line and flush it so readers see it immediately.
    pub async fn append_line(&mut self, line: &str) -> io::Result<()> {
        let mut record = Vec::with_capacity(line.len() + 1);
        record.extend_from_slice(line.as_bytes());
        record.push(b'\n');
        self.file.write_all(&record).await?;
        self.file.flush().await
    }
}
