//! Convert command implementation.

use super::load_context;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Convert every mapping (or only `only`) and save the results
///
/// A failing page does not stop the others; the command fails at the end
/// if any page failed.
pub fn convert_pages(config_path: &Path, only: &[PathBuf]) -> Result<()> {
    let (config, ctx) = load_context(config_path)?;

    for source in only {
        if config.mapping_for(source).is_none() {
            tracing::warn!("No mapping for {:?}, ignoring", source);
        }
    }

    let mut converted = 0usize;
    let mut failed = Vec::new();

    for mapping in config
        .mappings
        .iter()
        .filter(|m| only.is_empty() || only.contains(&m.source))
    {
        let target = ctx.target_path(mapping);
        let result = ctx
            .convert(mapping)
            .and_then(|page| page.save(&target));

        match result {
            Ok(()) => {
                tracing::info!("✓ {:?} → {:?}", mapping.source, target);
                converted += 1;
            }
            Err(err) => {
                tracing::error!("✗ {:?}: {}", mapping.source, err);
                failed.push(mapping.source.clone());
            }
        }
    }

    tracing::info!("Converted {} pages", converted);

    if !failed.is_empty() {
        bail!("{} page(s) failed to convert: {:?}", failed.len(), failed);
    }
    Ok(())
}
