//! Typed view over the string-only INI document.
//!
//! Every value on disk is a string.  Callers describe what they expect to find
//! in a section with a [`schema::SettingsSchema`]: one entry per setting with
//! its logical kind and a default.  [`resolve::resolve`] then reads the
//! section, coerces each stored string to its kind (or falls back to the
//! default), and hands back [`settings::Settings`].

pub mod resolve;
pub mod schema;
pub mod settings;
pub mod value;
