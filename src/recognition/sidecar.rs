//! Recognition responses captured ahead of time.
//!
//! For `music/song.mp3` the response is read from `music/song.mp3.json`, or
//! from `<dir>/song.mp3.json` when a response directory is configured.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::{RecognitionError, Recognizer, parse_response};

#[derive(Debug, Clone, Default)]
pub struct SidecarRecognizer {
    dir: Option<PathBuf>,
}

impl SidecarRecognizer {
    /// Read responses stored next to each audio file.
    pub fn beside_audio() -> Self {
        Self { dir: None }
    }

    /// Read responses from a single directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Where the response for `audio` is expected.
    pub fn response_path(&self, audio: &Path) -> PathBuf {
        match (&self.dir, audio.file_name()) {
            (Some(dir), Some(name)) => {
                let mut file_name = name.to_os_string();
                file_name.push(".json");
                dir.join(file_name)
            }
            _ => {
                let mut full = audio.as_os_str().to_os_string();
                full.push(".json");
                PathBuf::from(full)
            }
        }
    }

    fn read(&self, audio: &Path) -> Result<Value, RecognitionError> {
        let response_path = self.response_path(audio);
        if !response_path.exists() {
            return Err(RecognitionError::MissingResponse(response_path));
        }

        let body = std::fs::read_to_string(&response_path).map_err(|e| RecognitionError::Io {
            path: response_path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(response = %response_path.display(), "Loaded saved response");
        parse_response(&body)
    }
}

#[async_trait]
impl Recognizer for SidecarRecognizer {
    async fn recognize(&self, path: &Path) -> Result<Value, RecognitionError> {
        let recognizer = self.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || recognizer.read(&path))
            .await
            .map_err(|e| RecognitionError::Failed(format!("Response read task failed: {}", e)))?
    }
}
