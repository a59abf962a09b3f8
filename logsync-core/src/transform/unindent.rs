//! Promotion of first-level bullets to paragraphs.

use super::{Transform, TransformContext};
use crate::config::DocumentOptions;
use crate::error::Result;

/// Turns the outermost bullet level into plain paragraphs
///
/// `- text` becomes `text`, each top-level block is separated from the
/// previous one by a blank line, and nested lines lose one level of
/// indentation (a tab, or two spaces) so children become the new top-level
/// list.
pub struct FirstLevelUnindenter;

fn strip_one_level(line: &str) -> &str {
    line.strip_prefix('\t')
        .or_else(|| line.strip_prefix("  "))
        .unwrap_or(line)
}

fn top_level_bullet(line: &str) -> Option<&str> {
    if line == "-" {
        Some("")
    } else {
        line.strip_prefix("- ")
    }
}

impl Transform for FirstLevelUnindenter {
    fn name(&self) -> &'static str {
        "unindent_first_level"
    }

    fn is_enabled(&self, options: &DocumentOptions) -> Result<bool> {
        Ok(options.unindent_first_level)
    }

    fn apply(&self, input: &str, ctx: &TransformContext<'_>) -> Result<String> {
        let mut out: Vec<&str> = Vec::new();
        let mut blocks = 0usize;

        for line in input.split('\n') {
            match top_level_bullet(line) {
                Some(text) => {
                    blocks += 1;
                    if out.last().is_some_and(|last| !last.is_empty()) {
                        out.push("");
                    }
                    if !text.trim().is_empty() {
                        out.push(text);
                    }
                }
                None => out.push(strip_one_level(line)),
            }
        }

        tracing::debug!(page = ctx.page, blocks, "unindented first level");
        Ok(out.join("\n"))
    }
}
