//! Commands that only read: saved responses, current tags, configuration.

use anyhow::Context;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::config::{self, Config};
use crate::fields::map_fields;
use crate::metadata::{LoftyTagStore, read_tags};
use crate::tree::key_paths;

fn load_response(path: &Path) -> anyhow::Result<Value> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read response {:?}", path))?;
    serde_json::from_str(&body).with_context(|| format!("Failed to parse response {:?}", path))
}

/// Print the field set a response maps to under the configured fields
pub fn cmd_fields(config: &Config, response: &Path) -> anyhow::Result<()> {
    config.fields.validate()?;
    let tree = load_response(response)?;
    let fields = map_fields(&tree, &config.fields);

    if fields.is_empty() {
        println!("No mapped fields found in {:?}", response);
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

/// Print every key-path in a response, one per line
pub fn cmd_keys(response: &Path, unique: bool) -> anyhow::Result<()> {
    let tree = load_response(response)?;
    let mut seen = HashSet::new();

    for path in key_paths(&tree) {
        let line = path.to_string();
        if unique && !seen.insert(line.clone()) {
            continue;
        }
        println!("{}", line);
    }
    Ok(())
}

/// Show the current tags of an audio file
pub fn cmd_show(path: &Path) -> anyhow::Result<()> {
    let store = LoftyTagStore::load(path)?;
    let tags = read_tags(&store);

    println!("{}", path.display());
    let rows = [
        ("Title", &tags.title),
        ("Artist", &tags.artist),
        ("Album", &tags.album),
        ("Publisher", &tags.publisher),
        ("Released", &tags.release_date),
        ("Genre", &tags.genre),
    ];
    for (label, value) in rows {
        println!("  {:<10} {}", label, value.as_deref().unwrap_or("-"));
    }
    Ok(())
}

/// Print the effective configuration as TOML, optionally saving it
pub fn cmd_config(config: &Config, write: bool) -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) => println!("# Default config location: {}", path.display()),
        None => println!("# No config directory on this platform"),
    }
    println!("{}", config::to_toml(config)?);

    if write {
        config::save(config)?;
        println!("✓ Configuration saved");
    }
    Ok(())
}
