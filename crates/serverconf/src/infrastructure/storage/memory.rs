//! In-memory backend for testing.
//!
//! Lets tests observe exactly what the store writes, and switch individual
//! operations into failure mode to exercise the store's error paths without
//! touching the file system.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::settings_store::ConfigBackend;

#[derive(Debug, Default)]
struct MemoryState {
    /// `None` means the file does not exist.
    contents: Option<String>,
    fail_creates: bool,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// A [`ConfigBackend`] that keeps the file text in memory.
///
/// Clones share the same state, so a test can hand one clone to the store and
/// inspect the other.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    path: PathBuf,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    /// A backend whose file does not exist yet.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// A backend whose file already holds `contents`.
    pub fn with_contents(path: impl Into<PathBuf>, contents: &str) -> Self {
        let backend = Self::missing(path);
        backend.set_contents(contents);
        backend
    }

    /// Current file text, `None` if the file does not exist.
    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Replaces the file text behind the store's back.
    pub fn set_contents(&self, contents: &str) {
        self.lock().contents = Some(contents.to_string());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn fail_creates(&self, fail: bool) {
        self.lock().fail_creates = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A panic while holding the lock only happens inside a failing test.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn denied(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, format!("{what} denied"))
}

impl ConfigBackend for MemoryBackend {
    fn location(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> io::Result<()> {
        let mut state = self.lock();
        if state.fail_creates {
            return Err(denied("create"));
        }
        state.contents.get_or_insert_with(String::new);
        Ok(())
    }

    fn read_to_string(&self) -> io::Result<String> {
        let state = self.lock();
        if state.fail_reads {
            return Err(denied("read"));
        }
        Ok(state.contents.clone().unwrap_or_default())
    }

    fn write_all(&self, contents: &str) -> io::Result<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(denied("write"));
        }
        state.contents = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }
}
