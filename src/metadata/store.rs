//! Lofty-backed tag store.
//!
//! Supports MP3 (ID3v2), FLAC and OGG (Vorbis comments), M4A (MP4 atoms)
//! and WAV through lofty's format-independent [`Tag`].

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};

use super::{TagField, TagStore};
use crate::error::{Error, Result};

/// The primary tag of one audio file, held in memory until saved.
pub struct LoftyTagStore {
    path: PathBuf,
    tag_type: TagType,
    tag: Option<Tag>,
}

impl LoftyTagStore {
    /// Probe `path` and load its primary tag, if it has one.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found(path));
        }

        let tagged_file = Probe::open(path)
            .map_err(|e| Error::metadata(path, format!("Failed to open file for probing: {}", e)))?
            .read()
            .map_err(|e| Error::metadata(path, format!("Failed to read file metadata: {}", e)))?;

        let tag_type = tagged_file.primary_tag_type();
        let tag = tagged_file.tag(tag_type).cloned();

        Ok(Self {
            path: path.to_path_buf(),
            tag_type,
            tag,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tag_mut(&mut self) -> &mut Tag {
        let tag_type = self.tag_type;
        self.tag.get_or_insert_with(|| Tag::new(tag_type))
    }
}

/// The lofty item each field is stored under. Publisher is `Label`, which
/// lofty maps to ID3v2 `TPUB`, Vorbis `LABEL` and the MP4 label atom.
fn item_key(field: TagField) -> ItemKey {
    match field {
        TagField::Title => ItemKey::TrackTitle,
        TagField::Artist => ItemKey::TrackArtist,
        TagField::Album => ItemKey::AlbumTitle,
        TagField::Publisher => ItemKey::Label,
        TagField::ReleaseDate => ItemKey::ReleaseDate,
    }
}

impl TagStore for LoftyTagStore {
    fn has_tag(&self) -> bool {
        self.tag.is_some()
    }

    fn init_tag(&mut self) {
        self.tag_mut();
    }

    fn field(&self, field: TagField) -> Option<String> {
        self.tag
            .as_ref()?
            .get_string(&item_key(field))
            .map(str::to_string)
    }

    /// Returns `false` when the file's tag format has no slot for `field`.
    fn set_field(&mut self, field: TagField, value: &str) -> bool {
        let tag_type = self.tag_type;
        let inserted = self.tag_mut().insert_text(item_key(field), value.to_string());
        if !inserted {
            tracing::debug!(path = %self.path.display(), ?tag_type, %field, "Tag format cannot hold field");
        }
        inserted
    }

    fn genre(&self) -> Option<String> {
        self.tag.as_ref()?.genre().map(|s| s.into_owned())
    }

    /// Write the tag back to the file. A store without a tag has nothing to
    /// write and succeeds.
    fn save(&mut self) -> Result<()> {
        let Some(tag) = self.tag.as_ref() else {
            return Ok(());
        };
        tag.save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| Error::persist(&self.path, e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "Wrote tags");
        Ok(())
    }
}
