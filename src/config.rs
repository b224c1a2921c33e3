//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\song-tagger\config.toml
//! - macOS: ~/Library/Application Support/song-tagger/config.toml
//! - Linux: ~/.config/song-tagger/config.toml
//!
//! Every section is optional. A file that only lists extra `[[fields]]`
//! entries, for example, keeps the default recognizer and batch settings.
//!
//! ```toml
//! [recognizer]
//! command = "python3"
//! args = ["recognize.py"]
//!
//! [[fields]]
//! name = "isrc"
//! path = ["track", "isrc"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fields::FieldSpec;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How recognition responses are obtained
    pub recognizer: RecognizerConfig,

    /// Batch processing settings
    pub batch: BatchConfig,

    /// Canonical field name → key-path mappings, applied in order
    pub fields: FieldSpec,
}

/// Recognition settings
///
/// With a `command`, each file is recognized by running it. Without one,
/// saved responses are read from `response_dir`, or from `<file>.json`
/// beside each audio file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Program that prints a recognition response for the path it is given
    pub command: Option<String>,

    /// Arguments placed before the audio path
    pub args: Vec<String>,

    /// Directory holding saved `<file name>.json` responses
    pub response_dir: Option<PathBuf>,
}

/// Batch processing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files processed at the same time
    pub concurrency: usize,

    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            recursive: false,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("song-tagger"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from `path`
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir.join("config.toml"))
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = to_toml(config)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Render configuration as pretty TOML
pub fn to_toml(config: &Config) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(ConfigError::Serialize)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::KeyPath;

    #[test]
    fn test_default_config_serializes() {
        let toml = to_toml(&Config::default()).unwrap();
        assert!(toml.contains("[recognizer]"));
        assert!(toml.contains("[batch]"));
        assert!(toml.contains("[[fields]]"));
        assert!(toml.contains("{tracktitle}"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.recognizer.command = Some("python3".to_string());
        config.recognizer.args = vec!["recognize.py".to_string()];
        config.batch.concurrency = 4;
        config.fields.push("isrc", ["track", "isrc"]);

        let toml = to_toml(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[recognizer]
response_dir = "/responses"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(
            config.recognizer.response_dir,
            Some(PathBuf::from("/responses"))
        );
        assert_eq!(config.recognizer.command, None);
        assert_eq!(config.batch.concurrency, 1);
        assert_eq!(config.fields, FieldSpec::default());
    }

    #[test]
    fn test_fields_replace_defaults_in_order() {
        let toml = r#"
[[fields]]
name = "trackTitle"
path = ["track", "title"]

[[fields]]
name = "firstMatch"
path = ["matches", 0, "id"]
"#;
        let config: Config = toml::from_str(toml).unwrap();

        let names: Vec<_> = config.fields.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["trackTitle", "firstMatch"]);
        assert_eq!(
            config.fields.entries()[1].path,
            KeyPath::from("matches").child(0usize).child("id")
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.batch.recursive = true;
        save_to(&config, &path).unwrap();

        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is [not toml").unwrap();

        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.toml")), Config::default());
    }
}
