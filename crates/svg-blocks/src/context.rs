//! Context windows around extracted SVG elements.
//!
//! A window is the raw document text adjacent to a span, bounded by a number
//! of characters (not bytes). Windows are stored verbatim in the records; the
//! copies written into placeholder comments go through
//! [`sanitize_comment_text`] first.

use crate::locator::Span;

/// Default window length in characters.
pub const DEFAULT_CONTEXT_CHARS: usize = 150;

/// Tokens that must never appear inside a placeholder comment, with their
/// escaped replacements.
const RESERVED_TOKENS: [(&str, &str); 3] = [
    ("SVG_PLACEHOLDER", "SVG-PLACEHOLDER"),
    ("CONTEXT_BEFORE", "CONTEXT-BEFORE"),
    ("CONTEXT_AFTER", "CONTEXT-AFTER"),
];

/// Returns `(before, after)`: up to `context_chars` characters immediately
/// preceding `span.start` and immediately following `span.end`.
pub fn extract_context(source: &str, span: Span, context_chars: usize) -> (String, String) {
    (
        window_before(&source[..span.start], context_chars).to_string(),
        window_after(&source[span.end..], context_chars).to_string(),
    )
}

fn window_before(head: &str, context_chars: usize) -> &str {
    if context_chars == 0 {
        return "";
    }
    let start = head
        .char_indices()
        .rev()
        .nth(context_chars - 1)
        .map_or(0, |(i, _)| i);
    &head[start..]
}

fn window_after(tail: &str, context_chars: usize) -> &str {
    let end = tail
        .char_indices()
        .nth(context_chars)
        .map_or(tail.len(), |(i, _)| i);
    &tail[..end]
}

/// Makes `text` safe to embed in an HTML comment of a placeholder block.
///
/// Whitespace runs collapse to a single space, every `--` is split by a space
/// so the comment cannot be closed early, and marker tokens are escaped.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_comment_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if c == '-' && out.ends_with('-') {
            out.push(' ');
        }
        out.push(c);
    }
    if pending_space {
        out.push(' ');
    }

    for (token, escaped) in RESERVED_TOKENS {
        if out.contains(token) {
            out = out.replace(token, escaped);
        }
    }
    out
}

/// Normal form used when comparing windows: sanitized and trimmed.
pub fn comparable(text: &str) -> String {
    sanitize_comment_text(text).trim().to_string()
}
