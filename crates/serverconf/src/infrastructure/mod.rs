//! Infrastructure layer for serverconf.
//!
//! Contains the OS-facing adapters: the file-system backend and the lookup
//! of the platform directory the configuration file lives in.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `serverconf_core`, but MUST NOT be imported by the `application` layer.

pub mod storage;
