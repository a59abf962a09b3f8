//! Unwrapping of `[[target]]` page links.

use super::{Transform, TransformContext};
use crate::config::DocumentOptions;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

static WIKILINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn wikilink_regex() -> &'static Regex {
    WIKILINK_REGEX.get_or_init(|| Regex::new(r"\[\[([^\[\]]+)\]\]").unwrap())
}

/// Replaces every `[[Name]]` with `Name`
///
/// Hugo has no notion of Logseq pages, so the links would otherwise render
/// as literal brackets.
pub struct LinkUnwrapper;

impl Transform for LinkUnwrapper {
    fn name(&self) -> &'static str {
        "unwrap_links"
    }

    fn is_enabled(&self, options: &DocumentOptions) -> Result<bool> {
        Ok(options.remove_internal_links)
    }

    fn apply(&self, input: &str, ctx: &TransformContext<'_>) -> Result<String> {
        let re = wikilink_regex();
        let count = re.find_iter(input).count();
        tracing::debug!(page = ctx.page, links = count, "unwrapping internal links");

        Ok(re.replace_all(input, "$1").into_owned())
    }
}
