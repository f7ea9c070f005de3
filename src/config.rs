//! The npmrc document model.
//!
//! A [`ConfigDocument`] is an ordered list of entries: `key = value`
//! properties and `;` comments. Order is preserved through parsing,
//! mutation and serialization, so templating a stored npmrc only touches the
//! keys it sets.

use crate::error::{Error, Result};
use crate::parser::{expand_env_vars, parse_bool, parse_entries};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::trace;

/// A single line of an npmrc document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A `key = value` line.
    Property { key: String, value: String },
    /// A `;` comment line, holding the text after the marker.
    Comment(String),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Property { key, value } => write!(f, "{} = {}", key, value),
            Entry::Comment(text) => write!(f, ";{}", text),
        }
    }
}

/// An npmrc file held in memory.
///
/// A loaded document keeps duplicate keys as written; [`get`](Self::get)
/// and [`set`](Self::set) act on the first occurrence. Comments are
/// independent entries and any number of them may carry the same text.
///
/// Text added through the API must read back unchanged, so keys and values
/// are trimmed and anything that would break the line structure is rejected.
///
/// # Examples
///
/// ```
/// use nodejs_provision::ConfigDocument;
///
/// let mut doc = ConfigDocument::load("; managed by CI\nregistry = https://old.example.com/\n");
/// doc.set("registry", "https://npm.example.com/").unwrap();
/// doc.set("strict-ssl", "false").unwrap();
///
/// assert_eq!(
///     doc.serialize(),
///     "; managed by CI\nregistry = https://npm.example.com/\nstrict-ssl = false\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    entries: Vec<Entry>,
}

impl ConfigDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse npmrc text. Never fails; unrecognized lines are kept as comments.
    pub fn load(content: &str) -> Self {
        let entries = parse_entries(content);
        trace!(entries = entries.len(), "Loaded npmrc document");

        Self { entries }
    }

    /// Load a document from a file path.
    ///
    /// Returns `Err(Error::FileNotFound)` if the file doesn't exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self::load(&content))
    }

    /// Write the serialized document to `path`, replacing any existing file.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.serialize()).map_err(|e| Error::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Property { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Get a property as a boolean, if it is `true` or `false`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(parse_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a property.
    ///
    /// Key and value are trimmed. An existing key keeps its position; a new
    /// key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = property_key(&key.into())?;
        let value = property_value(&value.into())?;

        for entry in &mut self.entries {
            if let Entry::Property { key: k, value: v } = entry {
                if *k == key {
                    *v = value;
                    return Ok(());
                }
            }
        }

        self.entries.push(Entry::Property { key, value });
        Ok(())
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Property { key: k, .. } if k == key))?;

        match self.entries.remove(index) {
            Entry::Property { value, .. } => Some(value),
            Entry::Comment(_) => None,
        }
    }

    /// Append a comment line. `text` is written after the `;` as given.
    pub fn add_comment(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        single_line(&text)?;

        self.entries.push(Entry::Comment(text));
        Ok(())
    }

    /// All entries in document order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Property key/value pairs in document order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Property { key, value } => Some((key.as_str(), value.as_str())),
            Entry::Comment(_) => None,
        })
    }

    /// Comment texts in document order.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Comment(text) => Some(text.as_str()),
            Entry::Property { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand `${VAR}` references in every property value.
    ///
    /// Fails without changing the document if an expanded value would span
    /// more than one line.
    pub fn expand_env(&mut self, env: &HashMap<String, String>) -> Result<()> {
        let mut expanded = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if let Entry::Property { value, .. } = entry {
                expanded.push((index, property_value(&expand_env_vars(value, env))?));
            }
        }

        for (index, value) in expanded {
            if let Entry::Property { value: v, .. } = &mut self.entries[index] {
                *v = value;
            }
        }

        Ok(())
    }

    /// Render the document, one newline-terminated line per entry.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

fn invalid_entry(text: &str, message: &str) -> Error {
    Error::InvalidEntry {
        text: text.to_string(),
        message: message.to_string(),
    }
}

fn single_line(text: &str) -> Result<()> {
    if text.contains(&['\r', '\n'][..]) {
        return Err(invalid_entry(text, "line breaks are not allowed"));
    }
    Ok(())
}

fn property_key(key: &str) -> Result<String> {
    single_line(key)?;

    let key = key.trim();
    if key.is_empty() {
        return Err(invalid_entry(key, "key is empty"));
    }
    if key.starts_with(';') {
        return Err(invalid_entry(key, "key starts with the comment marker ';'"));
    }
    if key.contains('=') {
        return Err(invalid_entry(key, "key contains '='"));
    }

    Ok(key.to_string())
}

fn property_value(value: &str) -> Result<String> {
    single_line(value)?;
    Ok(value.trim().to_string())
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl FromStr for ConfigDocument {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::load(s))
    }
}
