//! Recursion marker.
//!
//! Following linked pages into sub-pages is not performed here; the marker
//! only validates the options and records what a later expansion stage
//! should do.

use super::{Transform, TransformContext};
use crate::config::DocumentOptions;
use crate::error::{PageError, Result};

/// Recursion settings recorded for a page that asked for them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursionRequest {
    pub target: String,
    pub depth: u32,
    pub skip_source: bool,
}

impl RecursionRequest {
    /// The request described by `options`, if recursion is enabled
    pub fn from_options(options: &DocumentOptions) -> Option<Self> {
        if !options.recursive {
            return None;
        }
        options.recursion_target().map(|target| Self {
            target: target.to_string(),
            depth: options.recursion_depth,
            skip_source: options.recursion_skip_source,
        })
    }
}

pub struct RecursionMarker;

impl Transform for RecursionMarker {
    fn name(&self) -> &'static str {
        "recursion"
    }

    fn is_enabled(&self, options: &DocumentOptions) -> Result<bool> {
        if !options.recursive {
            return Ok(false);
        }
        if options.recursion_target().is_none() {
            return Err(PageError::MissingRecursionTarget);
        }
        Ok(true)
    }

    fn apply(&self, input: &str, ctx: &TransformContext<'_>) -> Result<String> {
        if let Some(request) = RecursionRequest::from_options(ctx.options) {
            tracing::debug!(
                page = ctx.page,
                target = %request.target,
                depth = request.depth,
                skip_source = request.skip_source,
                "recursion requested"
            );
        }
        Ok(input.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedRoots;

    fn recursive(target: Option<&str>) -> DocumentOptions {
        DocumentOptions {
            recursive: true,
            recursion_target: target.map(String::from),
            recursion_depth: 2,
            recursion_skip_source: true,
            ..DocumentOptions::default()
        }
    }

    #[test]
    fn test_disabled_without_recursive_flag() {
        let options = DocumentOptions {
            recursion_target: Some("content/sub".into()),
            ..DocumentOptions::default()
        };
        assert!(!RecursionMarker.is_enabled(&options).unwrap());
        assert_eq!(RecursionRequest::from_options(&options), None);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        for options in [recursive(None), recursive(Some("")), recursive(Some("  "))] {
            assert!(matches!(
                RecursionMarker.is_enabled(&options),
                Err(PageError::MissingRecursionTarget)
            ));
        }
    }

    #[test]
    fn test_passthrough_and_request() {
        let options = recursive(Some("content/sub"));
        let roots = ResolvedRoots::new("/src", "/dst");
        let ctx = TransformContext {
            options: &options,
            roots: &roots,
            page: "home",
        };

        assert!(RecursionMarker.is_enabled(&options).unwrap());
        assert_eq!(RecursionMarker.apply("- a\n- b", &ctx).unwrap(), "- a\n- b");
        assert_eq!(
            RecursionRequest::from_options(&options),
            Some(RecursionRequest {
                target: "content/sub".into(),
                depth: 2,
                skip_source: true,
            })
        );
    }
}
