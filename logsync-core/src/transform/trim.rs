//! Removal of empty trailing bullets.

use super::{Transform, TransformContext};
use crate::config::DocumentOptions;
use crate::error::Result;

/// Removes the run of empty lines and empty bullets at the end of a page
///
/// Logseq always leaves a fresh `-` bullet at the bottom of a page.
pub struct TrailingEmptyBulletTrimmer;

pub(crate) fn is_blank_bullet(line: &str) -> bool {
    matches!(line, "" | " " | "-" | "- ")
}

impl Transform for TrailingEmptyBulletTrimmer {
    fn name(&self) -> &'static str {
        "remove_empty_trails"
    }

    fn is_enabled(&self, options: &DocumentOptions) -> Result<bool> {
        Ok(options.remove_empty_trails)
    }

    fn apply(&self, input: &str, ctx: &TransformContext<'_>) -> Result<String> {
        let lines: Vec<&str> = input.split('\n').collect();

        // The first line is kept even when it is blank
        let keep = lines
            .iter()
            .rposition(|line| !is_blank_bullet(line))
            .unwrap_or(0)
            + 1;

        if keep < lines.len() {
            tracing::debug!(
                page = ctx.page,
                removed = lines.len() - keep,
                "trimmed empty trailing bullets"
            );
        }

        Ok(lines[..keep].join("\n"))
    }
}
