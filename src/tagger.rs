//! Tagging service - recognize, map, and write tags for audio files.
//!
//! This is the high-level API:
//! 1. Ask the [`Recognizer`] for a response tree
//! 2. Map it to a [`FieldSet`] with the configured [`FieldSpec`]
//! 3. Load the file's tags and merge the fields in (or preview the merge)
//!
//! Each file is an independent job. Batches run several jobs at once but
//! never two for the same path.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, ResultExt};
use crate::fields::{FieldSet, FieldSpec, map_fields};
use crate::metadata::{
    FieldChange, LoftyTagStore, TagStore, WriteResult, apply_fields, preview_fields,
};
use crate::recognition::Recognizer;

/// Options for a tagging run
#[derive(Debug, Clone)]
pub struct TaggerOptions {
    /// Report what would change without saving anything
    pub dry_run: bool,
    /// Files processed at the same time in [`Tagger::tag_files`]
    pub concurrency: usize,
}

impl Default for TaggerOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            concurrency: 1,
        }
    }
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Tags were merged and saved
    Written { fields: FieldSet, result: WriteResult },
    /// Dry run: the changes that would have been made
    Preview {
        fields: FieldSet,
        changes: Vec<FieldChange>,
    },
    /// The response produced no fields, the file was not opened
    NothingToWrite,
}

/// Service that tags audio files from recognition responses
pub struct Tagger<R> {
    recognizer: R,
    spec: FieldSpec,
    options: TaggerOptions,
}

impl<R: Recognizer> Tagger<R> {
    pub fn new(recognizer: R, spec: FieldSpec, options: TaggerOptions) -> Self {
        Self {
            recognizer,
            spec,
            options,
        }
    }

    pub fn options(&self) -> &TaggerOptions {
        &self.options
    }

    /// Recognize `path` and map the response, without touching the file.
    pub async fn extract(&self, path: &Path) -> Result<FieldSet> {
        let tree = self.recognizer.recognize(path).await?;
        let fields = map_fields(&tree, &self.spec);
        tracing::debug!(path = %path.display(), fields = fields.len(), "Mapped recognition response");
        Ok(fields)
    }

    /// Run the whole pipeline for one file on disk.
    pub async fn tag_file(&self, path: &Path) -> Result<TagOutcome> {
        let fields = self.extract(path).await?;
        if fields.is_empty() {
            tracing::warn!(path = %path.display(), "Recognition response had none of the mapped fields");
            return Ok(TagOutcome::NothingToWrite);
        }

        let mut store = LoftyTagStore::load(path)?;
        self.write(path, fields, &mut store)
    }

    /// Run the pipeline against a store the caller already holds.
    pub async fn tag_store<S: TagStore + ?Sized>(
        &self,
        path: &Path,
        store: &mut S,
    ) -> Result<TagOutcome> {
        let fields = self.extract(path).await?;
        if fields.is_empty() {
            return Ok(TagOutcome::NothingToWrite);
        }
        self.write(path, fields, store)
    }

    fn write<S: TagStore + ?Sized>(
        &self,
        path: &Path,
        fields: FieldSet,
        store: &mut S,
    ) -> Result<TagOutcome> {
        if self.options.dry_run {
            let changes = preview_fields(&fields, store);
            return Ok(TagOutcome::Preview { fields, changes });
        }

        let result = apply_fields(&fields, store)
            .with_context(format!("Tagging {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            updated = result.fields_updated.len(),
            "Tagged"
        );
        Ok(TagOutcome::Written { fields, result })
    }

    /// Tag several files, up to `concurrency` at a time.
    ///
    /// Results come back in input order with duplicates removed. Paths that
    /// name the same file (`./a.mp3` and `a.mp3`) count as duplicates, and
    /// the first spelling is kept. A failure is recorded for its file and the
    /// batch carries on.
    pub async fn tag_files(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<TagOutcome>)> {
        let mut seen = HashSet::new();
        let unique: Vec<&PathBuf> = paths
            .iter()
            .filter(|p| {
                let key = std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
                seen.insert(key)
            })
            .collect();
        let total = unique.len();

        stream::iter(unique.into_iter().enumerate())
            .map(|(i, path)| async move {
                let result = self.tag_file(path).await;
                if let Err(ref e) = result {
                    tracing::warn!(path = %path.display(), "Tagging failed: {}", e);
                }
                if (i + 1) % 10 == 0 {
                    tracing::info!("Processed {}/{} files", i + 1, total);
                }
                (path.clone(), result)
            })
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await
    }
}
