//! Song recognition - obtaining a response tree for an audio file.
//!
//! # Architecture
//!
//! The recognition service itself is an external collaborator. This module
//! defines the [`Recognizer`] seam and two ways to reach a service without
//! owning its transport:
//! - [`CommandRecognizer`] - run an external program that prints the
//!   service's JSON response (e.g. a small `shazamio` script)
//! - [`SidecarRecognizer`] - read a response captured earlier and stored
//!   next to the audio file
//!
//! Either way the result is an untyped `serde_json::Value`; interpreting it
//! is the job of [`crate::fields`].

pub mod command;
pub mod sidecar;

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub use command::CommandRecognizer;
pub use sidecar::SidecarRecognizer;

/// Errors that can occur while recognizing a track
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error("Failed to launch recognizer '{program}': {message}")]
    Launch { program: String, message: String },

    #[error("Recognizer failed: {0}")]
    Failed(String),

    #[error("Failed to parse recognition response: {0}")]
    Parse(String),

    #[error("Failed to read recognition response {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("No recognition response found at {0}")]
    MissingResponse(PathBuf),

    #[error("No matches found for track")]
    NoMatches,
}

/// Source of recognition responses.
///
/// Implement this trait to plug in another service or to mock one in tests.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognize the audio at `path` and return the raw response tree.
    async fn recognize(&self, path: &Path) -> Result<Value, RecognitionError>;
}

#[async_trait]
impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    async fn recognize(&self, path: &Path) -> Result<Value, RecognitionError> {
        (**self).recognize(path).await
    }
}

/// Parse a JSON response body.
///
/// The root must be a mapping. A present but empty `matches` list means the
/// service heard the audio and found nothing.
pub fn parse_response(body: &str) -> Result<Value, RecognitionError> {
    let tree: Value =
        serde_json::from_str(body).map_err(|e| RecognitionError::Parse(e.to_string()))?;

    if !tree.is_object() {
        return Err(RecognitionError::Parse(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    if tree
        .get("matches")
        .and_then(Value::as_array)
        .is_some_and(|matches| matches.is_empty())
    {
        return Err(RecognitionError::NoMatches);
    }

    Ok(tree)
}
