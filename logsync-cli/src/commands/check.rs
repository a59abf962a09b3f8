//! Validate the configuration and report every problem found.

use anyhow::{bail, Context, Result};
use logsync_core::{ConfigError, SyncConfig};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CheckSummary<'a> {
    valid: bool,
    mappings: usize,
    hints: &'a [String],
}

pub fn check_config(config_path: &Path, json: bool) -> Result<()> {
    let config = SyncConfig::from_file(config_path).context("Failed to load configuration")?;

    let hints = match config.validate() {
        Ok(()) => Vec::new(),
        Err(ConfigError::Invalid(hints)) => hints,
        Err(err) => return Err(err).context("Failed to validate configuration"),
    };

    let summary = CheckSummary {
        valid: hints.is_empty(),
        mappings: config.mappings.len(),
        hints: &hints,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.valid {
        println!("Config OK: {} mappings", summary.mappings);
    } else {
        println!("Config has {} problem(s):", hints.len());
        for hint in &hints {
            println!("- {}", hint);
        }
    }

    if !summary.valid {
        bail!("invalid configuration");
    }
    Ok(())
}
