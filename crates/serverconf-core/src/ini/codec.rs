//! Text codec for INI documents.
//!
//! Accepted input:
//! ```text
//! # comment            ; also a comment
//! [section]
//! key = value
//! other: value         (`:` works as a delimiter too)
//! multi = first line
//!     continued line   (indented lines extend the previous value)
//! ```
//!
//! An indented whitespace-only line inside a value is an empty value line; a
//! truly empty line ends the value.
//!
//! Output is always `key = value`, one blank line after every section, with
//! continuation lines indented by a tab.

use std::fmt::Write as _;

use thiserror::Error;

use crate::ini::document::{normalize_key, IniDocument};

/// Errors produced by [`parse`].  Line numbers are 1-based.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IniError {
    /// An option appeared before any `[section]` header.
    #[error("line {line}: option found before any section header")]
    MissingSectionHeader { line: usize },

    /// The same `[section]` header appeared twice.
    #[error("line {line}: section {name:?} already exists")]
    DuplicateSection { line: usize, name: String },

    /// The same option appeared twice in one section.
    #[error("line {line}: option {key:?} in section {section:?} already exists")]
    DuplicateOption {
        line: usize,
        section: String,
        key: String,
    },

    /// A line that is neither a header, an option, a comment, nor blank.
    #[error("line {line}: cannot parse {content:?}")]
    MalformedLine { line: usize, content: String },
}

impl IniError {
    /// The 1-based line the error was detected on.
    pub fn line(&self) -> usize {
        match self {
            Self::MissingSectionHeader { line }
            | Self::DuplicateSection { line, .. }
            | Self::DuplicateOption { line, .. }
            | Self::MalformedLine { line, .. } => *line,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parses INI text into a document.
///
/// # Errors
///
/// Returns [`IniError`] at the first line that breaks the format.  Parsing
/// stops there; no partial document is returned.
///
/// # Examples
///
/// ```rust
/// use serverconf_core::parse;
///
/// let doc = parse("[Server]\nPort = 3080\n").unwrap();
/// assert_eq!(doc.get("Server", "port"), Some("3080"));
/// ```
pub fn parse(text: &str) -> Result<IniDocument, IniError> {
    let mut doc = IniDocument::new();
    let mut current: Option<String> = None;
    // Option that an indented line would extend.
    let mut last_key: Option<String> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();

        // Inside a value, an indented line is value text even when it is
        // whitespace only or starts with a comment prefix.
        if is_indented(raw_line) {
            if let (Some(section), Some(key)) = (current.as_deref(), last_key.as_deref()) {
                if let Some(value) = doc
                    .section_mut(section)
                    .and_then(|s| s.value_mut(key))
                {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
        }

        if trimmed.is_empty() {
            last_key = None;
            continue;
        }
        if is_comment(trimmed) {
            continue;
        }

        if let Some(name) = section_header(trimmed) {
            if name.is_empty() {
                return Err(IniError::MalformedLine {
                    line,
                    content: trimmed.to_string(),
                });
            }
            if doc.has_section(name) {
                return Err(IniError::DuplicateSection {
                    line,
                    name: name.to_string(),
                });
            }
            doc.ensure_section(name);
            current = Some(name.to_string());
            last_key = None;
            continue;
        }

        let Some(pos) = trimmed.find(|c: char| c == '=' || c == ':') else {
            return Err(IniError::MalformedLine {
                line,
                content: trimmed.to_string(),
            });
        };
        let key = normalize_key(&trimmed[..pos]);
        let value = trimmed[pos + 1..].trim();
        if key.is_empty() {
            return Err(IniError::MalformedLine {
                line,
                content: trimmed.to_string(),
            });
        }

        let Some(section_name) = current.as_deref() else {
            return Err(IniError::MissingSectionHeader { line });
        };
        let section = doc.ensure_section(section_name);
        if section.contains_key(&key) {
            return Err(IniError::DuplicateOption {
                line,
                section: section_name.to_string(),
                key,
            });
        }
        section.set(&key, value);
        last_key = Some(key);
    }

    Ok(doc)
}

/// Serializes a document to INI text.
///
/// ```rust
/// use serverconf_core::{serialize, IniDocument};
///
/// let mut doc = IniDocument::new();
/// doc.set("Server", "port", "3080");
/// assert_eq!(serialize(&doc), "[Server]\nport = 3080\n\n");
/// ```
pub fn serialize(doc: &IniDocument) -> String {
    let mut out = String::new();
    for section in doc.sections() {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "[{}]", section.name());
        for (key, value) in section.iter() {
            write_option(&mut out, key, value);
        }
        out.push('\n');
    }
    out
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

fn section_header(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn write_option(out: &mut String, key: &str, value: &str) {
    let mut lines = value.split('\n');
    let first = lines.next().unwrap_or_default();
    if first.is_empty() {
        let _ = writeln!(out, "{key} =");
    } else {
        let _ = writeln!(out, "{key} = {first}");
    }
    for continuation in lines {
        let _ = writeln!(out, "\t{continuation}");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_text_gives_empty_document() {
        let doc = parse("").expect("parse");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_sections_and_options() {
        // Arrange
        let text = "[Server]\nhost = localhost\nport=3080\n\n[VPCS]\nvpcs_path: /usr/bin/vpcs\n";

        // Act
        let doc = parse(text).expect("parse");

        // Assert
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["Server", "VPCS"]);
        assert_eq!(doc.get("Server", "host"), Some("localhost"));
        assert_eq!(doc.get("Server", "port"), Some("3080"));
        assert_eq!(doc.get("VPCS", "vpcs_path"), Some("/usr/bin/vpcs"));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let text = "# leading comment\n; another\n\n[s]\n  # indented comment\nk = v\n";
        let doc = parse(text).expect("parse");
        assert_eq!(doc.section("s").unwrap().len(), 1);
        assert_eq!(doc.get("s", "k"), Some("v"));
    }

    #[test]
    fn test_parse_first_delimiter_wins() {
        let doc = parse("[s]\nurl = http://host:3080\n").expect("parse");
        assert_eq!(doc.get("s", "url"), Some("http://host:3080"));
    }

    #[test]
    fn test_parse_lowercases_keys() {
        let doc = parse("[s]\nAutoStart = True\n").expect("parse");
        assert_eq!(doc.section("s").unwrap().iter().next(), Some(("autostart", "True")));
    }

    #[test]
    fn test_parse_empty_value() {
        let doc = parse("[s]\nk =\n").expect("parse");
        assert_eq!(doc.get("s", "k"), Some(""));
    }

    #[test]
    fn test_parse_continuation_lines_join_with_newline() {
        // Arrange
        let text = "[s]\nmotd = first\n    second\n\tthird\nnext = 1\n";

        // Act
        let doc = parse(text).expect("parse");

        // Assert
        assert_eq!(doc.get("s", "motd"), Some("first\nsecond\nthird"));
        assert_eq!(doc.get("s", "next"), Some("1"));
    }

    #[test]
    fn test_parse_blank_line_ends_continuation() {
        let err = parse("[s]\nk = v\n\n    stray\n").unwrap_err();
        assert_eq!(
            err,
            IniError::MalformedLine {
                line: 4,
                content: "stray".to_string()
            }
        );
    }

    #[test]
    fn test_parse_indented_blank_line_stays_in_value() {
        // Arrange
        let text = "[s]\nmotd = a\n\t\n\tb\n  \nnext = 1\n";

        // Act
        let doc = parse(text).expect("parse");

        // Assert
        assert_eq!(doc.get("s", "motd"), Some("a\n\nb\n"));
        assert_eq!(doc.get("s", "next"), Some("1"));
    }

    #[test]
    fn test_parse_indented_comment_prefix_inside_value_is_text() {
        let doc = parse("[s]\nk = first\n\t# not a comment\n").expect("parse");
        assert_eq!(doc.get("s", "k"), Some("first\n# not a comment"));
    }

    #[test]
    fn test_parse_option_before_header_is_error() {
        let err = parse("k = v\n[s]\n").unwrap_err();
        assert_eq!(err, IniError::MissingSectionHeader { line: 1 });
    }

    #[test]
    fn test_parse_duplicate_section_is_error() {
        let err = parse("[s]\n[t]\n[s]\n").unwrap_err();
        assert_eq!(
            err,
            IniError::DuplicateSection {
                line: 3,
                name: "s".to_string()
            }
        );
    }

    #[test]
    fn test_parse_duplicate_option_ignores_case() {
        let err = parse("[s]\nkey = 1\nKEY = 2\n").unwrap_err();
        assert_eq!(
            err,
            IniError::DuplicateOption {
                line: 3,
                section: "s".to_string(),
                key: "key".to_string()
            }
        );
    }

    #[test]
    fn test_parse_line_without_delimiter_is_error() {
        let err = parse("[s]\njust some words\n").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(matches!(err, IniError::MalformedLine { .. }));
    }

    #[test]
    fn test_parse_empty_header_and_empty_key_are_errors() {
        assert!(matches!(parse("[ ]\n"), Err(IniError::MalformedLine { line: 1, .. })));
        assert!(matches!(parse("[s]\n= v\n"), Err(IniError::MalformedLine { line: 2, .. })));
    }

    #[test]
    fn test_serialize_layout() {
        // Arrange
        let mut doc = IniDocument::new();
        doc.set("Server", "host", "localhost");
        doc.set("Server", "port", "3080");
        doc.ensure_section("Empty");

        // Act
        let text = serialize(&doc);

        // Assert
        assert_eq!(text, "[Server]\nhost = localhost\nport = 3080\n\n[Empty]\n\n");
    }

    #[test]
    fn test_serialize_empty_and_multiline_values() {
        let mut doc = IniDocument::new();
        doc.set("s", "blank", "");
        doc.set("s", "motd", "one\ntwo");
        assert_eq!(serialize(&doc), "[s]\nblank =\nmotd = one\n\ttwo\n\n");
    }

    #[test]
    fn test_serialized_document_parses_back_identically() {
        // Arrange
        let mut doc = IniDocument::new();
        doc.set("Server", "images_path", "/srv/images");
        doc.set("Server", "auto_start", "true");
        doc.set("Server", "notes", "\nstarts on the next line");
        doc.ensure_section("Dynamips");

        // Act
        let restored = parse(&serialize(&doc)).expect("parse");

        // Assert
        assert_eq!(doc, restored);
    }

    #[test]
    fn test_values_with_empty_lines_survive_serialize_and_parse() {
        // Arrange
        let values = ["a\n\nb", "a\n", "\n", "a\n\n\n", "a\n#b\n;c"];

        for value in values {
            let mut doc = IniDocument::new();
            doc.set("s", "motd", value);
            doc.set("s", "after", "1");
            doc.set("Other", "keep", "1");

            // Act
            let restored = parse(&serialize(&doc));

            // Assert
            assert_eq!(restored.as_ref(), Ok(&doc), "{value:?}");
        }
    }
}
