//! # serverconf-core
//!
//! Shared library for serverconf containing the INI document model, the INI
//! text codec, and the typed setting schema used to read sections back out
//! of a document.
//!
//! This crate has zero dependencies on the file system or OS APIs.  All I/O
//! lives in the `serverconf` crate, which wraps a document read from disk in
//! a `SettingsStore`.
//!
//! # Architecture overview
//!
//! - **`ini`** – How settings look on disk.  An [`IniDocument`] is an ordered
//!   list of named sections, each an ordered list of `key = value` string
//!   pairs.  [`parse`] and [`serialize`] convert between text and documents.
//!
//! - **`domain`** – How settings look to callers.  Values are stored as
//!   strings but carry a logical [`SettingKind`] (integer, boolean, float,
//!   string).  A [`SettingsSchema`] lists the expected fields with their kinds
//!   and defaults, and [`resolve`] turns a stored section into typed
//!   [`Settings`].

pub mod domain;
pub mod ini;

pub use domain::resolve::{resolve, ResolveError};
pub use domain::schema::{FieldSpec, SchemaError, SettingsSchema};
pub use domain::settings::Settings;
pub use domain::value::{CoercionError, ParseKindError, SettingKind, SettingValue};
pub use ini::codec::{parse, serialize, IniError};
pub use ini::document::{check_key, check_section_name, IniDocument, NameError, Section};
