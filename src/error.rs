//! Application-wide error types.
//!
//! Library modules return [`Result`] with the [`Error`] enum defined here,
//! while the CLI and `main` use `anyhow` for convenient propagation.
//!
//! # Design
//!
//! - [`Error`]: top-level error enum
//! - [`RecognitionError`](crate::recognition::RecognitionError) for the
//!   recognition collaborator, converted automatically
//! - Path resolution and field mapping never fail; absence is a value there
//!
//! # Example
//!
//! ```ignore
//! use song_tagger::error::{Result, ResultExt};
//!
//! fn tag(path: &Path, fields: &FieldSet) -> Result<()> {
//!     let mut store = LoftyTagStore::load(path)?;
//!     apply_fields(fields, &mut store).with_context("while tagging")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag container could not be opened or read
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Tag container could not be written back to disk
    #[error("Failed to save tags to {path}: {message}")]
    Persist { path: PathBuf, message: String },

    /// Recognition collaborator failed
    #[error("Recognition error: {0}")]
    Recognition(#[from] crate::recognition::RecognitionError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a persistence error.
    pub fn persist(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Persist {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is a failed save.
    pub fn is_persist(&self) -> bool {
        match self {
            Self::Persist { .. } => true,
            Self::WithContext { source, .. } => source.is_persist(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
