//! Slug generation for page titles.

use deunicode::deunicode;
use regex::Regex;
use std::sync::OnceLock;

static NON_ALNUM_REGEX: OnceLock<Regex> = OnceLock::new();

fn non_alnum_regex() -> &'static Regex {
    NON_ALNUM_REGEX.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Convert a page name to a URL-safe ASCII slug
///
/// Rules:
/// - Transliterate Unicode to ASCII
/// - Lowercase
/// - Drop apostrophes so contractions stay whole
/// - Replace every other run of non-alphanumerics with a single hyphen
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use logsync_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Café Notes"), "cafe-notes");
/// assert_eq!(slugify("2024_03_01"), "2024-03-01");
/// ```
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input).to_lowercase().replace(['\'', '`'], "");

    non_alnum_regex()
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}
