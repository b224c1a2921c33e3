//! Song Tagger - writes song recognition results into audio file tags.
//!
//! A recognition service answers with a deeply nested JSON document. This
//! application walks that document, pulls out a configurable set of fields,
//! decodes them, and merges them into the audio file's primary tag.

pub mod cli;
pub mod config;
pub mod error;
pub mod fields;
pub mod metadata;
pub mod recognition;
pub mod tagger;
#[cfg(test)]
pub mod test_utils;
pub mod tree;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("song_tagger=info".parse()?))
        .init();

    cli::run_command(&args)
}
