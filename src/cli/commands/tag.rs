//! Recognize-and-tag command.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::recognition::{CommandRecognizer, Recognizer, SidecarRecognizer};
use crate::tagger::{TagOutcome, Tagger, TaggerOptions};

use super::{TagArgs, collect_audio_files};

/// Tag a file or every audio file in a directory
pub fn cmd_tag(rt: &Runtime, config: &Config, args: &TagArgs) -> anyhow::Result<()> {
    config.fields.validate()?;

    let files = collect_audio_files(&args.path, args.recursive || config.batch.recursive)?;
    if files.is_empty() {
        println!("No audio files found in {:?}", args.path);
        return Ok(());
    }

    let options = TaggerOptions {
        dry_run: args.dry_run,
        concurrency: args.concurrency.unwrap_or(config.batch.concurrency),
    };
    let tagger = Tagger::new(recognizer(config, args), config.fields.clone(), options);

    if tagger.options().dry_run {
        println!("Dry run: no files will be modified\n");
    }
    println!(
        "Tagging {} file(s), {} at a time...\n",
        files.len(),
        tagger.options().concurrency.max(1)
    );

    let results = rt.block_on(tagger.tag_files(&files));

    let mut written = 0;
    let mut unchanged = 0;
    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(TagOutcome::Written { result, .. }) => {
                written += 1;
                let names: Vec<_> = result.fields_updated.iter().map(|f| f.name()).collect();
                println!("✓ {}", path.display());
                println!("    {}", names.join(", "));
            }
            Ok(TagOutcome::Preview { changes, .. }) if changes.is_empty() => {
                unchanged += 1;
                println!("- {} (already up to date)", path.display());
            }
            Ok(TagOutcome::Preview { changes, .. }) => {
                written += 1;
                println!("~ {}", path.display());
                for change in changes {
                    println!(
                        "    {}: {} -> {}",
                        change.field,
                        change.current_value.as_deref().unwrap_or("(empty)"),
                        change.new_value
                    );
                }
            }
            Ok(TagOutcome::NothingToWrite) => {
                unchanged += 1;
                println!("- {} (no mapped fields in response)", path.display());
            }
            Err(e) => {
                failed += 1;
                eprintln!("✗ {}: {}", path.display(), e);
            }
        }
    }

    println!();
    let verb = if args.dry_run { "Would tag" } else { "Tagged" };
    println!(
        "{} {} file(s), {} unchanged, {} failed",
        verb, written, unchanged, failed
    );

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, results.len());
    }
    Ok(())
}

/// Pick the recognizer: a command (CLI over config), else saved responses.
fn recognizer(config: &Config, args: &TagArgs) -> Box<dyn Recognizer> {
    let command = match (&args.command, &config.recognizer.command) {
        (Some(program), _) => Some(CommandRecognizer::new(program.clone(), args.args.clone())),
        (None, Some(program)) => Some(CommandRecognizer::new(
            program.clone(),
            config.recognizer.args.clone(),
        )),
        (None, None) => None,
    };
    if let Some(command) = command {
        tracing::info!(program = command.program(), "Recognizing with external command");
        return Box::new(command);
    }

    match args
        .response_dir
        .as_ref()
        .or(config.recognizer.response_dir.as_ref())
    {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Reading saved responses");
            Box::new(SidecarRecognizer::in_dir(dir))
        }
        None => Box::new(SidecarRecognizer::beside_audio()),
    }
}
