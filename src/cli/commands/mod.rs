//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `tag`: recognize audio files and write their tags
//! - `inspect`: look at saved responses, current tags and configuration

mod inspect;
mod tag;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config;

pub use inspect::{cmd_config, cmd_fields, cmd_keys, cmd_show};
pub use tag::cmd_tag;

/// Song Tagger CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "SONG_TAGGER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Recognize audio files and write the results into their tags
    Tag(TagArgs),
    /// Print the fields a saved recognition response maps to
    Fields {
        /// Path to a JSON recognition response
        response: PathBuf,
    },
    /// List every key-path in a saved recognition response
    Keys {
        /// Path to a JSON recognition response
        response: PathBuf,
        /// Print each path only once
        #[arg(short, long)]
        unique: bool,
    },
    /// Show the current tags of an audio file
    Show {
        /// Path to the audio file
        path: PathBuf,
    },
    /// Print the effective configuration
    Config {
        /// Also save it to the default config location
        #[arg(long)]
        write: bool,
    },
}

/// Arguments for `tag`
#[derive(Args, Debug, Clone)]
pub struct TagArgs {
    /// Audio file or directory
    pub path: PathBuf,
    /// Recursive directory scan
    #[arg(short, long)]
    pub recursive: bool,
    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
    /// Directory of saved `<file name>.json` responses
    #[arg(long, env = "SONG_TAGGER_RESPONSE_DIR")]
    pub response_dir: Option<PathBuf>,
    /// Program that prints a recognition response for the file it is given
    #[arg(long)]
    pub command: Option<String>,
    /// Argument passed to the recognizer program before the file (repeatable)
    #[arg(long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,
    /// Number of files processed at the same time
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    match &cli.command {
        Commands::Tag(args) => {
            let rt = Runtime::new()?;
            cmd_tag(&rt, &config, args)
        }
        Commands::Fields { response } => cmd_fields(&config, response),
        Commands::Keys { response, unique } => cmd_keys(response, *unique),
        Commands::Show { path } => cmd_show(path),
        Commands::Config { write } => cmd_config(&config, *write),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Collect audio files from a path (file or directory)
pub(crate) fn collect_audio_files(path: &Path, recursive: bool) -> std::io::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = if recursive {
        walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_audio_file(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect()
    } else {
        std::fs::read_dir(path)?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|e| is_audio_file(&e.path()))
            .map(|e| e.path())
            .collect()
    };
    files.sort();
    Ok(files)
}

/// Check if a path has an audio file extension
pub(crate) fn is_audio_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    matches!(ext.as_deref(), Some("mp3" | "flac" | "ogg" | "m4a" | "wav"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tag_command() {
        let cli = Cli::try_parse_from([
            "song-tagger",
            "tag",
            "music",
            "--recursive",
            "--dry-run",
            "--command",
            "python3",
            "--arg",
            "-m",
            "--arg",
            "recognize",
            "-j",
            "4",
        ])
        .unwrap();

        let Commands::Tag(args) = cli.command else {
            panic!("expected tag command");
        };
        assert_eq!(args.path, PathBuf::from("music"));
        assert!(args.recursive);
        assert!(args.dry_run);
        assert_eq!(args.command.as_deref(), Some("python3"));
        assert_eq!(args.args, vec!["-m", "recognize"]);
        assert_eq!(args.concurrency, Some(4));
    }

    #[test]
    fn test_parse_keys_command() {
        let cli = Cli::try_parse_from(["song-tagger", "keys", "response.json", "--unique"]).unwrap();
        assert!(matches!(cli.command, Commands::Keys { unique: true, .. }));
    }

    #[test]
    fn test_parse_global_config_option() {
        let cli =
            Cli::try_parse_from(["song-tagger", "config", "--config", "/tmp/tagger.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tagger.toml")));
        assert!(matches!(cli.command, Commands::Config { write: false }));
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("song.mp3")));
        assert!(is_audio_file(Path::new("SONG.FLAC")));
        assert!(!is_audio_file(Path::new("song.mp3.json")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn test_collect_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("album");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("a.flac"), b"").unwrap();
        std::fs::write(dir.path().join("a.flac.json"), b"{}").unwrap();
        std::fs::write(nested.join("c.wav"), b"").unwrap();

        let flat = collect_audio_files(dir.path(), false).unwrap();
        assert_eq!(
            flat,
            vec![dir.path().join("a.flac"), dir.path().join("b.mp3")]
        );

        let deep = collect_audio_files(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&nested.join("c.wav")));
    }

    #[test]
    fn test_collect_single_file() {
        let files = collect_audio_files(Path::new("/music/song.mp3"), false).unwrap();
        assert_eq!(files, vec![PathBuf::from("/music/song.mp3")]);
    }
}
