//! Writing mapped fields into an audio file's tags.
//!
//! The tag container is reached through the [`TagStore`] trait, so the merge
//! logic here is independent of the file format. [`store::LoftyTagStore`]
//! is the production implementation; tests substitute an in-memory store.
//!
//! # Features
//! - Merge a [`FieldSet`] into the tags without erasing anything it lacks
//! - Preview the changes a merge would make
//! - Read back the current tag values

pub mod store;

use std::fmt;

use crate::error::Result;
use crate::fields::FieldSet;

pub use store::LoftyTagStore;

/// Tag fields the writer knows how to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagField {
    Title,
    Artist,
    Album,
    Publisher,
    ReleaseDate,
}

impl TagField {
    pub const ALL: [TagField; 5] = [
        TagField::Title,
        TagField::Artist,
        TagField::Album,
        TagField::Publisher,
        TagField::ReleaseDate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Publisher => "publisher",
            Self::ReleaseDate => "release date",
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which mapped field feeds which tag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagBinding {
    pub source: &'static str,
    pub target: TagField,
}

/// The fixed set of fields written by [`apply_fields`].
pub const TAG_BINDINGS: [TagBinding; 5] = [
    TagBinding {
        source: "trackTitle",
        target: TagField::Title,
    },
    TagBinding {
        source: "trackArtist",
        target: TagField::Artist,
    },
    TagBinding {
        source: "Album",
        target: TagField::Album,
    },
    TagBinding {
        source: "Label",
        target: TagField::Publisher,
    },
    TagBinding {
        source: "Released",
        target: TagField::ReleaseDate,
    },
];

/// A loaded tag container that can be read, modified and saved.
///
/// Implementations own the file handle; callers only see named fields.
pub trait TagStore {
    /// Whether the file already carries a tag container.
    fn has_tag(&self) -> bool;

    /// Create an empty tag container. No-op when one exists.
    fn init_tag(&mut self);

    /// Current value of a field.
    fn field(&self, field: TagField) -> Option<String>;

    /// Set a field in memory. Nothing reaches disk until [`save`](Self::save).
    ///
    /// Returns `false` when the container has no place for the field and the
    /// value was dropped.
    fn set_field(&mut self, field: TagField, value: &str) -> bool;

    /// Genre, for display only.
    fn genre(&self) -> Option<String> {
        None
    }

    /// Persist all pending changes.
    fn save(&mut self) -> Result<()>;
}

/// Result of [`apply_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Fields that were set
    pub fields_updated: Vec<TagField>,
    /// Fields left alone: no value was supplied, or the tag format
    /// cannot hold the field
    pub fields_skipped: Vec<TagField>,
}

/// A single field change, as reported by [`preview_fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: TagField,
    pub current_value: Option<String>,
    pub new_value: String,
}

/// Snapshot of the tag values a store currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub publisher: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
}

/// The value a binding would write, if any. Empty strings count as absent.
fn supplied<'a>(fields: &'a FieldSet, binding: &TagBinding) -> Option<&'a str> {
    fields.get(binding.source).filter(|value| !value.is_empty())
}

/// Merge `fields` into `store` and save once.
///
/// Only bindings with a non-empty value are written; every other field keeps
/// whatever the store already held. A value the store refuses is reported
/// as skipped, not updated. A missing tag container is created
/// first. A failed save is returned as [`Error::Persist`](crate::error::Error::Persist)
/// and nothing is reported as written.
pub fn apply_fields<S: TagStore + ?Sized>(fields: &FieldSet, store: &mut S) -> Result<WriteResult> {
    if !store.has_tag() {
        tracing::debug!("No tag container present, creating one");
        store.init_tag();
    }

    let mut result = WriteResult::default();
    for binding in &TAG_BINDINGS {
        match supplied(fields, binding) {
            Some(value) if store.set_field(binding.target, value) => {
                result.fields_updated.push(binding.target);
            }
            Some(_) => {
                tracing::warn!(field = %binding.target, "Tag format has no slot for field, skipping");
                result.fields_skipped.push(binding.target);
            }
            None => result.fields_skipped.push(binding.target),
        }
    }

    store.save()?;

    tracing::debug!(
        updated = result.fields_updated.len(),
        skipped = result.fields_skipped.len(),
        "Tags saved"
    );
    Ok(result)
}

/// Changes [`apply_fields`] would make, without touching the store.
///
/// Fields whose current value already equals the new one are left out.
pub fn preview_fields<S: TagStore + ?Sized>(fields: &FieldSet, store: &S) -> Vec<FieldChange> {
    TAG_BINDINGS
        .iter()
        .filter_map(|binding| {
            let new_value = supplied(fields, binding)?;
            let current_value = store.field(binding.target);
            (current_value.as_deref() != Some(new_value)).then(|| FieldChange {
                field: binding.target,
                current_value,
                new_value: new_value.to_string(),
            })
        })
        .collect()
}

/// Read every known field from `store`.
pub fn read_tags<S: TagStore + ?Sized>(store: &S) -> TagSnapshot {
    TagSnapshot {
        title: store.field(TagField::Title),
        artist: store.field(TagField::Artist),
        album: store.field(TagField::Album),
        publisher: store.field(TagField::Publisher),
        release_date: store.field(TagField::ReleaseDate),
        genre: store.genre(),
    }
}
