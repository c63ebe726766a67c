//! Turns a stored section into typed settings.

use thiserror::Error;
use tracing::trace;

use crate::domain::schema::SettingsSchema;
use crate::domain::settings::Settings;
use crate::domain::value::CoercionError;
use crate::ini::document::Section;

/// A stored value that does not match its declared kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("setting {key:?} in section {section:?} has value {raw:?}: {source}")]
pub struct ResolveError {
    pub section: String,
    pub key: String,
    pub raw: String,
    #[source]
    pub source: CoercionError,
}

/// Resolves every field of `schema` against `section`.
///
/// A field whose key is stored is coerced from its string; a field that is
/// absent (or the whole section missing) takes its default.  Keys in the
/// section that the schema does not declare are ignored.
///
/// # Errors
///
/// Returns [`ResolveError`] for the first stored value that fails coercion.
///
/// # Examples
///
/// ```rust
/// use serverconf_core::{parse, resolve, SettingsSchema};
///
/// let doc = parse("[Server]\nport = 8000\n").unwrap();
/// let schema = SettingsSchema::new()
///     .integer("port", 3080)?
///     .boolean("auto_start", true)?;
///
/// let settings = resolve("Server", &schema, doc.section("Server")).unwrap();
/// assert_eq!(settings.get_i64("port"), Some(8000));
/// assert_eq!(settings.get_bool("auto_start"), Some(true));
/// # Ok::<(), serverconf_core::SchemaError>(())
/// ```
pub fn resolve(
    section_name: &str,
    schema: &SettingsSchema,
    section: Option<&Section>,
) -> Result<Settings, ResolveError> {
    let mut settings = Settings::new();
    for field in schema.fields() {
        let stored = section.and_then(|s| s.get(&field.name));
        let value = match stored {
            Some(raw) => field.kind.coerce(raw).map_err(|source| ResolveError {
                section: section_name.to_string(),
                key: field.name.clone(),
                raw: raw.to_string(),
                source,
            })?,
            None => {
                trace!(section = section_name, key = %field.name, "using default");
                field.default.clone()
            }
        };
        settings.insert(&field.name, value);
    }
    Ok(settings)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
