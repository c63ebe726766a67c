//! In-memory INI document.
//!
//! Sections keep their insertion order, and so do the options inside each
//! section, so a document that is read and written back without changes
//! produces the same layout.
//!
//! Section names are case-sensitive.  Option names are case-insensitive: they
//! are lowercased on every insert and lookup.

use thiserror::Error;

/// A section or option name that would not read back from the written file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("section name {0:?} cannot be written to the configuration file")]
    Section(String),

    #[error("option name {0:?} cannot be written to the configuration file")]
    Key(String),
}

/// Lowercases and trims an option name.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Checks that `name` is written as `[name]` and parsed back unchanged.
///
/// # Errors
///
/// [`NameError::Section`] for an empty name, surrounding whitespace, or a
/// line break.
pub fn check_section_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() || name.trim() != name || name.contains(['\n', '\r']) {
        return Err(NameError::Section(name.to_string()));
    }
    Ok(())
}

/// Checks that `key` is written as `key = value` and parsed back as the same
/// option.
///
/// # Errors
///
/// [`NameError::Key`] when the trimmed key is empty, holds a delimiter or a
/// line break, or starts like a comment or a section header.
pub fn check_key(key: &str) -> Result<(), NameError> {
    let key = key.trim();
    let readable = !key.is_empty()
        && !key.contains(['=', ':', '\n', '\r'])
        && !key.starts_with(['#', ';', '[']);
    if !readable {
        return Err(NameError::Key(key.to_string()));
    }
    Ok(())
}

/// A named group of `key = value` string pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored string for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// A new key is appended after the existing ones; an existing key keeps
    /// its position.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        let key = normalize_key(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let key = normalize_key(key);
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn value_mut(&mut self, key: &str) -> Option<&mut String> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// An ordered collection of [`Section`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when the document has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Returns the section called `name`, appending an empty one first if it
    /// does not exist yet.
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Removes a whole section, returning it.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let pos = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(pos))
    }

    /// Iterates over sections in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Shortcut for `section(section)?.get(key)`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    /// Stores a value, creating the section when needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) -> Option<String> {
        self.ensure_section(section).set(key, value)
    }

    /// Drops every section.
    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
