//! Mapping recognition responses onto flat, named fields.
//!
//! A [`FieldSpec`] declares which key-path feeds which canonical field name.
//! [`map_fields`] applies it to a response tree and produces a [`FieldSet`]:
//! plain string values keyed by name, ready for the tag writer.
//!
//! The reserved `sections` entry is handled specially. Its value is the list
//! of response sections; the first one carries a `metadata` list of
//! `{title, text}` items which are expanded into one field per title
//! (`Album`, `Label`, `Released`, ...).

mod decode;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::tree::{KeyPath, resolve_path};

pub use decode::decode_form;

/// Reserved canonical name whose value is expanded into title/text fields.
pub const SECTIONS: &str = "sections";

/// One declared mapping: canonical name and where to find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub path: KeyPath,
}

/// Ordered table of canonical field name → key-path.
///
/// Entries are applied in declaration order, so a later entry (or section
/// title) writing the same name wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec {
    entries: Vec<FieldEntry>,
}

impl FieldSpec {
    /// An empty spec.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, path: impl Into<KeyPath>) -> Self {
        self.push(name, path);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, path: impl Into<KeyPath>) {
        self.entries.push(FieldEntry {
            name: name.into(),
            path: path.into(),
        });
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject entries that could never produce a field.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(Error::config(format!(
                    "field mapped from '{}' has an empty name",
                    entry.path
                )));
            }
            if entry.path.is_empty() {
                return Err(Error::config(format!(
                    "field '{}' has an empty path",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for FieldSpec {
    /// The mappings for a Shazam-style track response.
    fn default() -> Self {
        Self::new()
            .with("primary_genre", ["track", "genres", "primary"])
            .with("trackTitle", ["track", "urlparams", "{tracktitle}"])
            .with("trackArtist", ["track", "urlparams", "{trackartist}"])
            .with(SECTIONS, ["track", SECTIONS])
    }
}

impl<'a> IntoIterator for &'a FieldSpec {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Flat field name → decoded value map produced by [`map_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSet(BTreeMap<String, String>);

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert or overwrite a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Apply `spec` to a recognition response.
///
/// For each entry in order: unresolvable paths and nulls are skipped; the
/// reserved [`SECTIONS`] entry is expanded into title/text pairs; string
/// values are form-decoded and stored under the entry's name. Other value
/// kinds are ignored. Never fails.
pub fn map_fields(tree: &Value, spec: &FieldSpec) -> FieldSet {
    let mut fields = FieldSet::new();

    for entry in spec {
        let Some(value) = resolve_path(tree, &entry.path) else {
            tracing::trace!(field = %entry.name, path = %entry.path, "Path not present in response");
            continue;
        };

        if entry.name == SECTIONS {
            if let Some(items) = section_metadata(value) {
                for (title, text) in items {
                    fields.insert(title, text);
                }
            }
            continue;
        }

        if let Value::String(raw) = value {
            fields.insert(entry.name.as_str(), decode_form(raw));
        }
    }

    fields
}

/// Title/text pairs from the first section's `metadata` list.
///
/// Any shape problem drops the whole list rather than part of it.
fn section_metadata(sections: &Value) -> Option<Vec<(String, String)>> {
    let first = sections.as_array()?.first()?;
    let Some(items) = first.get("metadata").and_then(Value::as_array) else {
        tracing::debug!("First section has no metadata list");
        return None;
    };

    let pairs = items
        .iter()
        .map(|item| {
            let title = item.get("title")?.as_str()?;
            let text = item.get("text")?.as_str()?;
            Some((title.to_string(), text.to_string()))
        })
        .collect::<Option<Vec<_>>>();

    if pairs.is_none() {
        tracing::debug!("Section metadata has an item without a string title/text, skipping");
    }
    pairs
}
