//! Recognition through an external program.
//!
//! The program is run as `<program> <args...> <audio path>` and must print
//! the recognition response as JSON on stdout. Exit status other than zero
//! is a failure; stderr is included in the error.

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::process::Command;

use super::{RecognitionError, Recognizer, parse_response};

/// Runs a configured command per file.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, path: &Path) -> Result<Value, RecognitionError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| RecognitionError::Launch {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim().chars().take(200).collect::<String>()
            )));
        }

        parse_response(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl Recognizer for CommandRecognizer {
    async fn recognize(&self, path: &Path) -> Result<Value, RecognitionError> {
        tracing::debug!(program = %self.program, path = %path.display(), "Running recognizer");

        // The child blocks until the service answers, so keep it off the runtime
        let recognizer = self.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || recognizer.run(&path))
            .await
            .map_err(|e| RecognitionError::Failed(format!("Recognizer task failed: {}", e)))?
    }
}
