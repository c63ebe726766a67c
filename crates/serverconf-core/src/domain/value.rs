//! Logical setting kinds, typed values, and string coercion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spellings accepted as `true` (compared case-insensitively).
pub const TRUE_SPELLINGS: [&str; 4] = ["1", "yes", "true", "on"];
/// Spellings accepted as `false` (compared case-insensitively).
pub const FALSE_SPELLINGS: [&str; 4] = ["0", "no", "false", "off"];

/// Error raised when a stored string does not fit the expected kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("invalid integer: {0:?}")]
    InvalidInteger(String),

    #[error("invalid float: {0:?}")]
    InvalidFloat(String),

    #[error("not a boolean: {0:?}")]
    InvalidBoolean(String),
}

/// Error returned by [`SettingKind::from_str`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown setting kind {0:?} (expected int, bool, float, or string)")]
pub struct ParseKindError(pub String);

/// The logical type a stored string is read back as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Integer,
    Boolean,
    Float,
    String,
}

impl SettingKind {
    /// Converts a stored string into a value of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] when `raw` is not a valid literal for the
    /// kind.  Strings never fail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serverconf_core::{SettingKind, SettingValue};
    ///
    /// assert_eq!(SettingKind::Boolean.coerce("Yes"), Ok(SettingValue::Boolean(true)));
    /// assert_eq!(SettingKind::Integer.coerce(" 8_000 "), Ok(SettingValue::Integer(8000)));
    /// assert!(SettingKind::Boolean.coerce("maybe").is_err());
    /// ```
    pub fn coerce(self, raw: &str) -> Result<SettingValue, CoercionError> {
        match self {
            Self::Integer => parse_integer(raw).map(SettingValue::Integer),
            Self::Boolean => parse_boolean(raw).map(SettingValue::Boolean),
            Self::Float => parse_float(raw).map(SettingValue::Float),
            Self::String => Ok(SettingValue::String(raw.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Boolean => "bool",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Integer),
            "bool" | "boolean" => Ok(Self::Boolean),
            "float" => Ok(Self::Float),
            "str" | "string" => Ok(Self::String),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// A typed setting value.
///
/// Serializes to the bare JSON value (`3080`, `true`, `0.5`, `"text"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Integer(i64),
    Boolean(bool),
    Float(f64),
    String(String),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Integer(_) => SettingKind::Integer,
            Self::Boolean(_) => SettingKind::Boolean,
            Self::Float(_) => SettingKind::Float,
            Self::String(_) => SettingKind::String,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// The on-disk string form.
///
/// Floats always carry a fractional part (`5.0`, not `5`) so they read back
/// as floats when a file is edited by hand.
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Float(v) => {
                let text = v.to_string();
                if v.is_finite() && !text.contains('.') {
                    write!(f, "{text}.0")
                } else {
                    f.write_str(&text)
                }
            }
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u16> for SettingValue {
    fn from(v: u16) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

// ── Coercion helpers ──────────────────────────────────────────────────────────

/// Optional sign, then ASCII digits with single `_` separators between them.
fn parse_integer(raw: &str) -> Result<i64, CoercionError> {
    let invalid = || CoercionError::InvalidInteger(raw.to_string());
    let text = raw.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let well_formed = !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && digits.chars().all(|c| c.is_ascii_digit() || c == '_');
    if !well_formed {
        return Err(invalid());
    }

    let mut cleaned = String::with_capacity(digits.len() + 1);
    if negative {
        cleaned.push('-');
    }
    cleaned.extend(digits.chars().filter(|c| *c != '_'));
    cleaned.parse::<i64>().map_err(|_| invalid())
}

fn parse_float(raw: &str) -> Result<f64, CoercionError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoercionError::InvalidFloat(raw.to_string()))
}

fn parse_boolean(raw: &str) -> Result<bool, CoercionError> {
    let text = raw.trim().to_ascii_lowercase();
    if TRUE_SPELLINGS.contains(&text.as_str()) {
        Ok(true)
    } else if FALSE_SPELLINGS.contains(&text.as_str()) {
        Ok(false)
    } else {
        Err(CoercionError::InvalidBoolean(raw.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
