//! Render a single page to stdout.

use super::load_context;
use anyhow::{Context, Result};
use std::path::Path;

pub fn render_page(config_path: &Path, source: &Path) -> Result<()> {
    let (config, ctx) = load_context(config_path)?;

    let mapping = config
        .mapping_for(source)
        .with_context(|| format!("No mapping for {:?}", source))?;
    let page = ctx
        .convert(mapping)
        .with_context(|| format!("Failed to convert {:?}", source))?;

    println!("{}", page.output());
    Ok(())
}
