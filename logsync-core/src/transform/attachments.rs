//! Copying of image attachments into the destination site.

use super::{Transform, TransformContext};
use crate::config::DocumentOptions;
use crate::error::{PageError, Result};
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use url::Url;

static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();

fn image_regex() -> &'static Regex {
    IMAGE_REGEX.get_or_init(|| Regex::new(r"!\[[^\]]*\]\(([^)]+)\)").unwrap())
}

/// Copies local images from `<source>/assets` to `<destination>/static`
///
/// References are rewritten to `/<file name>`, which Hugo serves from the
/// `static` folder. Files sharing a name across different folders overwrite
/// each other; the last copy wins.
pub struct AttachmentResolver;

/// True for references with a scheme and a host, or any `file` URL
fn is_external(reference: &str) -> bool {
    match Url::parse(reference) {
        Ok(url) => url.host_str().is_some_and(|h| !h.is_empty()) || url.scheme() == "file",
        Err(_) => false,
    }
}

/// Byte range of the path inside a link destination
///
/// Handles `<path with spaces>` and trailing `"title"` parts.
fn path_span(destination: &str) -> (usize, usize) {
    let start = destination.len() - destination.trim_start().len();
    let rest = &destination[start..];

    if let Some(inner) = rest.strip_prefix('<') {
        if let Some(close) = inner.find('>') {
            return (start + 1, start + 1 + close);
        }
    }

    let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    (start, start + len)
}

fn file_name(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}

fn copy_failed(source: io::Error) -> PageError {
    PageError::Transform {
        transform: "include_attachments",
        source,
    }
}

impl AttachmentResolver {
    fn copy_asset(&self, name: &str, ctx: &TransformContext<'_>) -> Result<()> {
        let decoded = percent_decode_str(name)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| name.to_string());

        let source = ctx.roots.assets_dir().join(&decoded);
        if decoded.is_empty() || decoded == ".." || decoded.contains(['/', '\\']) {
            return Err(PageError::MissingAttachment { path: source });
        }

        match fs::metadata(&source) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(PageError::MissingAttachment { path: source }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(page = ctx.page, source = %source.display(), "attachment not found");
                return Err(PageError::MissingAttachment { path: source });
            }
            Err(err) => return Err(copy_failed(err)),
        }

        // create_dir_all tolerates the folder appearing concurrently
        let static_dir = ctx.roots.static_dir();
        fs::create_dir_all(&static_dir).map_err(copy_failed)?;

        let target = static_dir.join(Path::new(&decoded));
        fs::copy(&source, &target).map_err(copy_failed)?;

        tracing::debug!(
            page = ctx.page,
            source = %source.display(),
            target = %target.display(),
            "copied attachment"
        );
        Ok(())
    }
}

impl Transform for AttachmentResolver {
    fn name(&self) -> &'static str {
        "include_attachments"
    }

    fn is_enabled(&self, options: &DocumentOptions) -> Result<bool> {
        Ok(options.include_attachments)
    }

    fn apply(&self, input: &str, ctx: &TransformContext<'_>) -> Result<String> {
        let mut output = String::with_capacity(input.len());
        let mut copied = HashSet::new();
        let mut last = 0;

        for captures in image_regex().captures_iter(input) {
            let Some(destination) = captures.get(1) else {
                continue;
            };
            let (start, end) = path_span(destination.as_str());
            let reference = &destination.as_str()[start..end];

            if is_external(reference) {
                tracing::debug!(page = ctx.page, url = reference, "skipping external attachment");
                continue;
            }

            let name = file_name(reference);
            if copied.insert(name) {
                self.copy_asset(name, ctx)?;
            }

            let path_start = destination.start() + start;
            output.push_str(&input[last..path_start]);
            output.push('/');
            output.push_str(name);
            last = destination.start() + end;
        }

        output.push_str(&input[last..]);
        Ok(output)
    }
}
