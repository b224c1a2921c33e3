//! Command-line interface for song-tagger.
//!
//! This module provides commands for tagging audio files from recognition
//! responses and for inspecting responses while writing field mappings.

mod commands;

pub use commands::{Cli, Commands, TagArgs, run_command};
