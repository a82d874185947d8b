//! Settings persistence
//!
//! - **record**: the serialized settings record
//! - **storage**: file store abstraction (filesystem or in-memory)
//!
//! [`SettingsFile`] ties them together: it reads the record with a fail-safe
//! fallback to defaults and writes it back whole.

pub mod record;
pub mod storage;

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use record::SettingsRecord;
pub use storage::{FileStore, FsFileStore, MemoryFileStore};

/// Default settings location: `$PRESENTATION_SETTINGS_PATH` if set, otherwise
/// the platform config dir (or `.` when there is none)
pub fn settings_path() -> PathBuf {
    if let Ok(path) = env::var(crate::constants::config::PATH_ENV)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(crate::constants::config::APP_DIR);
    path.push(crate::constants::config::FILENAME);
    path
}

/// A settings file at a fixed path inside some file store
#[derive(Debug)]
pub struct SettingsFile<F> {
    path: PathBuf,
    files: F,
}

impl<F: FileStore> SettingsFile<F> {
    pub fn new(path: impl Into<PathBuf>, files: F) -> Self {
        Self {
            path: path.into(),
            files,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    /// Read the record. Never fails: a missing, unreadable or malformed file
    /// yields `SettingsRecord::defaults(host_full_screen)`.
    pub fn load(&self, host_full_screen: bool) -> SettingsRecord {
        if !self.files.exists(&self.path) {
            info!(path = %self.path.display(), "No settings file found, using defaults");
            return SettingsRecord::defaults(host_full_screen);
        }

        let bytes = match self.files.read_all(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %format!("{e:#}"), "Failed to read settings file, using defaults");
                return SettingsRecord::defaults(host_full_screen);
            }
        };

        match serde_json::from_slice::<SettingsRecord>(&bytes) {
            Ok(record) => {
                debug!(path = %self.path.display(), ?record, "Loaded settings");
                record
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse settings file, using defaults");
                SettingsRecord::defaults(host_full_screen)
            }
        }
    }

    /// Write the whole record, creating the parent directory first
    pub fn save(&mut self, record: &SettingsRecord) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            self.files
                .ensure_directory(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(record).context("Failed to serialize settings to JSON")?;

        self.files
            .write_all(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to write settings file {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}
