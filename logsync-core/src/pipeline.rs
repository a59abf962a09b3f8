//! Page conversion pipeline
//!
//! Flow: Source file → Transform chain → Front matter → Save
//!
//! A `Page` is created from a source file, transformed in memory and then
//! handed back to the caller for persistence. Nothing is written to the
//! destination tree except attachment copies made by the attachment
//! transform, which are not rolled back when a later transform fails.

use crate::config::{DocumentOptions, Mapping, ResolvedRoots};
use crate::error::{PageError, Result};
use crate::frontmatter::{inject_frontmatter, Clock, SystemClock};
use crate::transform::{build_chain, RecursionRequest, TransformContext};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Span;

/// Everything a page conversion needs besides the page and its mapping
///
/// Built once per run; pages can be converted in parallel against the
/// same context.
#[derive(Clone)]
pub struct PipelineContext {
    roots: ResolvedRoots,
    clock: Arc<dyn Clock + Send + Sync>,
    span: Span,
}

impl PipelineContext {
    /// Create a context using the system clock and the current span
    pub fn new(roots: ResolvedRoots) -> Self {
        Self {
            roots,
            clock: Arc::new(SystemClock),
            span: Span::current(),
        }
    }

    /// Use a different clock for the `date` field
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Parent span for the per-page spans
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn roots(&self) -> &ResolvedRoots {
        &self.roots
    }

    /// Absolute path of a mapping's source page
    pub fn source_path(&self, mapping: &Mapping) -> PathBuf {
        self.roots.source.join(&mapping.source)
    }

    /// Absolute path the converted page is saved to
    pub fn target_path(&self, mapping: &Mapping) -> PathBuf {
        self.roots.destination.join(&mapping.target)
    }

    /// Load, transform and annotate the page a mapping points at
    pub fn convert(&self, mapping: &Mapping) -> Result<Page> {
        Page::load_and_transform(&self.source_path(mapping), mapping, self)
    }
}

/// A single page being converted
#[derive(Debug, Clone)]
pub struct Page {
    input_filename: String,
    display_name: String,
    input: String,
    pub(crate) output: String,
    applied: Vec<&'static str>,
    recursion: Option<RecursionRequest>,
}

impl Page {
    /// Create a page from in-memory source text
    pub fn new(input_filename: impl Into<String>, input: impl Into<String>) -> Self {
        let input_filename = input_filename.into();
        let display_name = Path::new(&input_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_filename.clone());

        Self {
            input_filename,
            display_name,
            input: input.into(),
            output: String::new(),
            applied: Vec::new(),
            recursion: None,
        }
    }

    /// Read `source_path`, run the transform chain and add front matter
    pub fn load_and_transform(
        source_path: &Path,
        mapping: &Mapping,
        ctx: &PipelineContext,
    ) -> Result<Page> {
        let bytes = fs::read(source_path).map_err(|source| PageError::SourceRead {
            path: source_path.to_path_buf(),
            source,
        })?;
        // Invalid UTF-8 is replaced rather than rejected
        let input = String::from_utf8_lossy(&bytes).into_owned();

        let input_filename = source_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut page = Page::new(input_filename, input);
        page.transform(mapping, ctx)?;
        Ok(page)
    }

    /// Run the transform chain over the input, then inject front matter
    pub fn transform(&mut self, mapping: &Mapping, ctx: &PipelineContext) -> Result<()> {
        let span = tracing::info_span!(parent: &ctx.span, "page", name = %self.display_name);
        let _guard = span.enter();

        self.run_chain(&mapping.options, &ctx.roots)?;
        inject_frontmatter(self, &mapping.frontmatter, ctx.clock.as_ref());

        tracing::info!(applied = ?self.applied, "converted page");
        Ok(())
    }

    fn run_chain(&mut self, options: &DocumentOptions, roots: &ResolvedRoots) -> Result<()> {
        let ctx = TransformContext {
            options,
            roots,
            page: &self.display_name,
        };

        let mut text = self.input.clone();
        let mut applied = Vec::new();

        for transform in build_chain() {
            if !transform.is_enabled(options)? {
                tracing::trace!(transform = transform.name(), "transform disabled");
                continue;
            }

            text = transform.apply(&text, &ctx).inspect_err(|err| {
                tracing::warn!(transform = transform.name(), error = %err, "transform failed");
            })?;
            applied.push(transform.name());
        }

        if applied.contains(&"recursion") {
            self.recursion = RecursionRequest::from_options(options);
        }
        self.applied = applied;
        self.output = text;
        Ok(())
    }

    /// Write the converted text verbatim to `destination`
    pub fn save(&self, destination: &Path) -> Result<()> {
        let persist = |source| PageError::Persist {
            path: destination.to_path_buf(),
            source,
        };

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persist)?;
        }
        fs::write(destination, &self.output).map_err(persist)?;

        tracing::debug!(path = %destination.display(), bytes = self.output.len(), "saved page");
        Ok(())
    }

    /// Source file name including its extension
    pub fn input_filename(&self) -> &str {
        &self.input_filename
    }

    /// Source file name without its extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Source text as loaded
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Converted text; empty until the page has been transformed
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Names of the transforms that ran, in order
    pub fn applied(&self) -> &[&'static str] {
        &self.applied
    }

    /// Recursion settings recorded when the recursion marker ran
    pub fn recursion(&self) -> Option<&RecursionRequest> {
        self.recursion.as_ref()
    }
}
