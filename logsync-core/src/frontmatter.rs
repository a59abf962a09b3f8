//! Hugo front matter generation.
//!
//! Pages get a TOML block delimited by `+++` lines. Two fields are derived
//! for every page and overwrite caller-supplied keys of the same name:
//! `date` (conversion time, RFC 3339) and `title` (slug of the page name).

use crate::pipeline::Page;
use crate::slug::slugify;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use indexmap::IndexMap;
use serde_yaml::Value;

pub const DELIMITER: &str = "+++";

/// Source of the `date` field
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        chrono::Local::now().fixed_offset()
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Merge derived fields into a copy of `metadata`
pub fn merged_metadata(
    display_name: &str,
    metadata: &IndexMap<String, Value>,
    now: DateTime<FixedOffset>,
) -> IndexMap<String, Value> {
    let mut merged = metadata.clone();
    merged.insert(
        "date".to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    merged.insert("title".to_string(), Value::String(slugify(display_name)));
    merged
}

/// Render the full `+++` block, including the trailing newline
pub fn render_block(metadata: &IndexMap<String, Value>) -> String {
    let mut block = String::new();
    block.push_str(DELIMITER);
    block.push('\n');
    for (key, value) in metadata {
        block.push_str(&render_key(key));
        block.push_str(" = ");
        block.push_str(&quote(&render_value(value)));
        block.push('\n');
    }
    block.push_str(DELIMITER);
    block.push('\n');
    block
}

/// Prepend the front matter block to the page's converted text
pub fn inject_frontmatter(page: &mut Page, metadata: &IndexMap<String, Value>, clock: &dyn Clock) {
    let merged = merged_metadata(page.display_name(), metadata, clock.now());
    let block = render_block(&merged);

    tracing::debug!(page = page.display_name(), fields = merged.len(), "injecting front matter");

    let body = std::mem::take(&mut page.output);
    page.output = block + &body;
}

fn render_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        basic_string(key)
    }
}

/// Literal string when possible, basic string when the value needs escapes
fn quote(value: &str) -> String {
    if value.contains(['\'', '\n', '\r']) {
        basic_string(value)
    } else {
        format!("'{value}'")
    }
}

fn basic_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_value(k), render_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Tagged(tagged) => render_value(&tagged.value),
    }
}
