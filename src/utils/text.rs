//! Text helpers for page bodies and extracted copy.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap_or_else(|e| {
        panic!("Failed to compile whitespace regex: {e}. This is a programming error.")
    })
});

/// Truncates `text` in place to at most `max_chars` characters.
///
/// Cuts on a character boundary, so multi-byte text is never split.
pub fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
}

/// Returns the first `max_chars` characters of `text`.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Collapses every run of whitespace to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}
