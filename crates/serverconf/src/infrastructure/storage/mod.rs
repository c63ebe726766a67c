//! Storage infrastructure: where the configuration file lives and how its
//! bytes reach the disk.
//!
//! - `location` resolves `server.ini` / `server.conf` next to the host
//!   application's own settings file.
//! - `file` implements [`ConfigBackend`](crate::application::settings_store::ConfigBackend)
//!   over `std::fs`.
//! - `memory` is an in-memory backend with failure switches, used by tests.

pub mod file;
pub mod location;
pub mod memory;
