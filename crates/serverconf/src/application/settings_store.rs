//! SettingsStore: typed, section-scoped access to the local server
//! configuration file.
//!
//! The store keeps the whole file in memory as an [`IniDocument`].  Reads
//! re-parse the file; writes serialize the whole document and overwrite the
//! file.  No file handle is held between calls.
//!
//! # Load cycle
//!
//! ```text
//! load_settings(section, schema)
//!  ├─ ensure the section exists in memory
//!  ├─ resolve(schema)       stored string → typed value, or default
//!  └─ save_settings(...)    resolved values → section → write_config()
//! ```
//!
//! After a load the file always holds every declared key, so a user who opens
//! it sees the defaults that are in effect.
//!
//! # Failures
//!
//! File-system and format errors are logged here with `tracing` and also
//! returned, so callers can decide whether a lost write matters.  A failed
//! read leaves the in-memory document empty.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serverconf_core::{
    check_key, check_section_name, parse, resolve, serialize, IniDocument, IniError, NameError,
    ResolveError, Section, Settings, SettingsSchema,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file content is not valid INI.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: IniError,
    },

    /// A section or option name the file format cannot carry.  Nothing was
    /// changed.
    #[error(transparent)]
    InvalidName(#[from] NameError),
}

/// Error type for [`SettingsStore::load_settings`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The section name cannot be stored.  Nothing was changed.
    #[error(transparent)]
    InvalidName(#[from] NameError),

    /// A stored value does not parse as its declared kind.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Where the configuration text is stored.
///
/// The production implementation is `infrastructure::storage::file::FileBackend`;
/// tests use `infrastructure::storage::memory::MemoryBackend`.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigBackend: Send {
    /// Path reported in logs and errors.
    fn location(&self) -> &Path;
    /// Creates the (empty) file if it does not exist.  Never truncates.
    fn ensure_exists(&self) -> io::Result<()>;
    /// Returns the full text.  A missing file reads as empty.
    fn read_to_string(&self) -> io::Result<String>;
    /// Replaces the full text.
    fn write_all(&self, contents: &str) -> io::Result<()>;
}

/// One store per process: build it once at startup, call
/// [`SettingsStore::into_shared`], and clone the handle into every consumer.
pub type SharedSettingsStore<B> = Arc<Mutex<SettingsStore<B>>>;

/// In-memory view of the configuration file plus the backend it syncs to.
pub struct SettingsStore<B> {
    backend: B,
    document: IniDocument,
}

impl<B: ConfigBackend> SettingsStore<B> {
    /// Creates the file if needed and reads it.
    ///
    /// Neither step can fail the construction: both errors are logged and the
    /// store starts with an empty document.
    pub fn open(backend: B) -> Self {
        if let Err(e) = backend.ensure_exists() {
            error!(
                "could not create the local server configuration {}: {e}",
                backend.location().display()
            );
        }

        let mut store = Self {
            backend,
            document: IniDocument::new(),
        };
        // Already logged by read_config.
        let _ = store.read_config();
        store
    }

    /// Re-reads the file into memory.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file cannot be read, [`StoreError::Parse`] if
    /// it is not valid INI.  In both cases the in-memory document is reset to
    /// empty.
    pub fn read_config(&mut self) -> Result<(), StoreError> {
        let path = self.backend.location();
        let result = self
            .backend
            .read_to_string()
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|text| {
                parse(&text).map_err(|source| StoreError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            });

        match result {
            Ok(document) => {
                debug!(
                    "read {} section(s) from {}",
                    document.section_names().count(),
                    path.display()
                );
                self.document = document;
                Ok(())
            }
            Err(e) => {
                error!("could not read the local server configuration: {e}");
                self.document.clear();
                Err(e)
            }
        }
    }

    /// Serializes the whole in-memory document over the file.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the write fails.  The file may then be unchanged
    /// or partially written.
    pub fn write_config(&self) -> Result<(), StoreError> {
        let text = serialize(&self.document);
        self.backend.write_all(&text).map_err(|source| {
            let e = StoreError::Io {
                path: self.backend.location().to_path_buf(),
                source,
            };
            error!("could not write the local server configuration: {e}");
            e
        })
    }

    /// Returns every field of `schema` for `section`, typed, and writes the
    /// resolved values back to the file.
    ///
    /// The section is created if it does not exist.  The write-back happens
    /// even when nothing changed; if it fails the failure is logged and the
    /// resolved settings are still returned.
    ///
    /// # Errors
    ///
    /// [`LoadError::Resolve`] when a stored value cannot be coerced to the
    /// kind the schema declares for it, [`LoadError::InvalidName`] when the
    /// section name cannot be stored.  Nothing is written in either case.
    pub fn load_settings(
        &mut self,
        section: &str,
        schema: &SettingsSchema,
    ) -> Result<Settings, LoadError> {
        check_section_name(section)?;
        self.document.ensure_section(section);
        let settings = resolve(section, schema, self.document.section(section))?;

        if let Err(e) = self.save_settings(section, &settings) {
            warn!("resolved settings for [{section}] were not persisted: {e}");
        }
        Ok(settings)
    }

    /// Stores the string form of every value in `section` and rewrites the
    /// file.
    ///
    /// Keys already in the section that `settings` does not mention are kept.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidName`] if the section or any key cannot be stored;
    /// nothing changes then.  [`StoreError::Io`] if the write fails; the
    /// in-memory document keeps the new values in that case.
    pub fn save_settings(&mut self, section: &str, settings: &Settings) -> Result<(), StoreError> {
        check_section_name(section)?;
        for (name, _) in settings.iter() {
            check_key(name)?;
        }
        let target = self.document.ensure_section(section);
        for (name, value) in settings.iter() {
            target.set(name, value.to_string());
        }
        info!("saving {} setting(s) to [{section}]", settings.len());
        self.write_config()
    }

    /// Raw stored string, without any coercion.
    pub fn get_raw(&self, section: &str, key: &str) -> Option<&str> {
        self.document.get(section, key)
    }

    /// Stores a raw string in memory only; call [`write_config`](Self::write_config)
    /// to persist it.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidName`] if the section or key cannot be stored.
    pub fn set_raw(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        check_section_name(section)?;
        check_key(key)?;
        self.document.set(section, key, value);
        Ok(())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.document.section(name)
    }

    /// Section names in file order.
    pub fn sections(&self) -> Vec<&str> {
        self.document.section_names().collect()
    }

    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    pub fn path(&self) -> &Path {
        self.backend.location()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Wraps the store in the handle shared by every consumer in the process.
    pub fn into_shared(self) -> SharedSettingsStore<B> {
        Arc::new(Mutex::new(self))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
