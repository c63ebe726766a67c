//! File-system backend for the configuration file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::settings_store::ConfigBackend;
use crate::infrastructure::storage::location::{config_file_path, LocateError, SettingsLocator};

/// Reads and rewrites a single file on disk.
///
/// Every write replaces the whole file in place (no temp file and rename).
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend for `server.ini` / `server.conf` next to the settings file the
    /// locator reports.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError`] if the locator cannot produce a path.
    pub fn from_locator(locator: &dyn SettingsLocator) -> Result<Self, LocateError> {
        config_file_path(locator).map(Self::new)
    }
}

impl ConfigBackend for FileBackend {
    fn location(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        debug!("ensured config file exists at {}", self.path.display());
        Ok(())
    }

    fn read_to_string(&self) -> io::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    fn write_all(&self, contents: &str) -> io::Result<()> {
        fs::write(&self.path, contents)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
