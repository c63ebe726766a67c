//! Declared fields of a settings section.

use thiserror::Error;

use crate::domain::value::{SettingKind, SettingValue};
use crate::ini::document::{check_key, normalize_key, NameError};

/// Error raised while building a [`SettingsSchema`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field {0:?} is declared twice")]
    DuplicateField(String),

    #[error("default for field {name:?} is a {actual}, expected {expected}")]
    DefaultKindMismatch {
        name: String,
        expected: SettingKind,
        actual: SettingKind,
    },

    #[error(transparent)]
    InvalidName(#[from] NameError),
}

/// One declared setting: name, kind, and the value used when none is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: SettingKind,
    pub default: SettingValue,
}

/// Ordered list of the settings a caller expects in a section.
///
/// # Example
///
/// ```rust
/// use serverconf_core::SettingsSchema;
///
/// let schema = SettingsSchema::new()
///     .string("host", "localhost")?
///     .integer("port", 3080)?
///     .boolean("auto_start", true)?;
/// assert_eq!(schema.len(), 3);
/// # Ok::<(), serverconf_core::SchemaError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsSchema {
    fields: Vec<FieldSpec>,
}

impl SettingsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, checking that `default` matches `kind`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateField`] when `name` (case-insensitively) is
    /// already declared, [`SchemaError::DefaultKindMismatch`] when the default
    /// has a different kind, [`SchemaError::InvalidName`] when `name` cannot be
    /// stored as an option.
    pub fn push(
        &mut self,
        name: &str,
        kind: SettingKind,
        default: impl Into<SettingValue>,
    ) -> Result<&mut Self, SchemaError> {
        check_key(name)?;
        let name = normalize_key(name);
        let default = default.into();
        if self.fields.iter().any(|f| f.name == name) {
            return Err(SchemaError::DuplicateField(name));
        }
        if default.kind() != kind {
            return Err(SchemaError::DefaultKindMismatch {
                name,
                expected: kind,
                actual: default.kind(),
            });
        }
        self.fields.push(FieldSpec {
            name,
            kind,
            default,
        });
        Ok(self)
    }

    /// Builder form of [`push`](Self::push).
    pub fn field(
        mut self,
        name: &str,
        kind: SettingKind,
        default: impl Into<SettingValue>,
    ) -> Result<Self, SchemaError> {
        self.push(name, kind, default)?;
        Ok(self)
    }

    pub fn integer(self, name: &str, default: i64) -> Result<Self, SchemaError> {
        self.field(name, SettingKind::Integer, default)
    }

    pub fn boolean(self, name: &str, default: bool) -> Result<Self, SchemaError> {
        self.field(name, SettingKind::Boolean, default)
    }

    pub fn float(self, name: &str, default: f64) -> Result<Self, SchemaError> {
        self.field(name, SettingKind::Float, default)
    }

    pub fn string(self, name: &str, default: &str) -> Result<Self, SchemaError> {
        self.field(name, SettingKind::String, default)
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        let name = normalize_key(name);
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
