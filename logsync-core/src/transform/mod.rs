//! Text transforms applied to a page before front matter is added.
//!
//! Each transform is a standalone value with an enablement predicate and a
//! text-to-text `apply`. The chain order is fixed; which transforms actually
//! run is decided per page by the predicates.
//!
//! # Modules
//!
//! - `recursion`: Records recursion intent, text passes through unchanged
//! - `wikilinks`: Unwraps `[[Page]]` links to plain `Page`
//! - `attachments`: Copies referenced images into the destination `static` folder
//! - `trim`: Removes empty bullets at the end of the page
//! - `unindent`: Promotes first-level bullets to paragraphs

mod attachments;
mod recursion;
mod trim;
mod unindent;
mod wikilinks;

pub use attachments::AttachmentResolver;
pub use recursion::{RecursionMarker, RecursionRequest};
pub use trim::TrailingEmptyBulletTrimmer;
pub use unindent::FirstLevelUnindenter;
pub use wikilinks::LinkUnwrapper;

use crate::config::{DocumentOptions, ResolvedRoots};
use crate::error::Result;

/// Per-page data handed to every transform call
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub options: &'a DocumentOptions,
    pub roots: &'a ResolvedRoots,
    /// Display name of the page being converted
    pub page: &'a str,
}

/// A single conditional text-to-text step
pub trait Transform {
    /// Stable name used in logs and in `Page::applied`
    fn name(&self) -> &'static str;

    /// Whether this transform runs for a page with these options
    ///
    /// An error aborts the whole chain.
    fn is_enabled(&self, options: &DocumentOptions) -> Result<bool>;

    /// Transform `input`, returning the new text
    fn apply(&self, input: &str, ctx: &TransformContext<'_>) -> Result<String>;
}

/// The fixed transform chain, in execution order
pub fn build_chain() -> Vec<Box<dyn Transform>> {
    vec![
        Box::new(RecursionMarker),
        Box::new(LinkUnwrapper),
        Box::new(AttachmentResolver),
        Box::new(TrailingEmptyBulletTrimmer),
        Box::new(FirstLevelUnindenter),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order_is_fixed() {
        let names: Vec<_> = build_chain().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "recursion",
                "unwrap_links",
                "include_attachments",
                "remove_empty_trails",
                "unindent_first_level",
            ]
        );
    }

    #[test]
    fn test_chain_is_disabled_by_default() {
        let options = DocumentOptions::default();
        for transform in build_chain() {
            assert!(
                !transform.is_enabled(&options).unwrap(),
                "{} should be off by default",
                transform.name()
            );
        }
    }
}
