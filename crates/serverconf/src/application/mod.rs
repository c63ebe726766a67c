//! Application layer for the settings store.
//!
//! - **`settings_store`** – The read-modify-write cycle over the local server
//!   configuration file: load a section through a schema, write resolved
//!   values back, save caller-supplied values.  The store depends only on the
//!   [`settings_store::ConfigBackend`] trait; the file-system implementation
//!   lives in `infrastructure::storage` and is injected at construction time.

pub mod settings_store;
