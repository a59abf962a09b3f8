//! CLI command implementations.

pub mod check;
pub mod convert;
pub mod render;

pub use check::check_config;
pub use convert::convert_pages;
pub use render::render_page;

use anyhow::{Context, Result};
use logsync_core::{PipelineContext, SyncConfig};
use std::path::Path;

/// Load and validate the config, then build the shared pipeline context
fn load_context(config_path: &Path) -> Result<(SyncConfig, PipelineContext)> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = SyncConfig::from_file(config_path).context("Failed to load configuration")?;
    config.validate().context("Configuration is invalid")?;

    let roots = config.resolved_roots();
    tracing::debug!(source = ?roots.source, destination = ?roots.destination, "resolved roots");

    Ok((config, PipelineContext::new(roots)))
}
