//! Span location for top-level SVG elements.
//!
//! The locator is a single forward pass over the raw bytes of a document with
//! a stack of open `<svg` offsets. It does not build a DOM: apart from `<svg`
//! and `</svg` tags, the only constructs it understands are the ones whose
//! contents must be ignored (comments, CDATA sections and the raw-text bodies
//! of `<script>` and `<style>`).
//!
//! ```text
//! <p>a</p><svg><g><svg/></g></svg><p>b</p>
//!         ^-----------------------^  one span, the inner <svg/> is content
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const SVG: &[u8] = b"svg";

/// Elements whose bodies are raw text and never contain markup.
const RAW_TEXT_ELEMENTS: [&[u8]; 2] = [b"script", b"style"];

/// Half-open byte range of one top-level SVG element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "span must not be empty");
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Locates every top-level `<svg>...</svg>` element in `source`.
///
/// Spans are returned ordered by start offset and never overlap. Nested SVG
/// elements are part of their outermost ancestor's span. A self-closing
/// `<svg .../>` outside any other SVG is a span of its own.
///
/// # Errors
///
/// Returns [`Error::UnbalancedMarkup`] with the offset of the innermost
/// unclosed `<svg` if the document ends inside an SVG element.
pub fn locate_spans(source: &str) -> Result<Vec<Span>> {
    let bytes = source.as_bytes();
    let mut spans = Vec::new();
    let mut open_tags: Vec<usize> = Vec::new();
    let mut pos = 0;

    while let Some(at) = find_byte(bytes, pos, b'<') {
        let rest = &bytes[at..];

        if rest.starts_with(b"<!--") {
            pos = comment_end(bytes, at + 4);
        } else if rest.starts_with(b"<![CDATA[") {
            pos = skip_past(bytes, at + 9, b"]]>");
        } else if let Some(name) = RAW_TEXT_ELEMENTS
            .iter()
            .find(|name| tag_named(bytes, at, false, name))
        {
            let body_start = tag_end(bytes, at + 1 + name.len());
            pos = skip_raw_text(bytes, body_start, name);
        } else if tag_named(bytes, at, false, SVG) {
            let end = tag_end(bytes, at + 1 + SVG.len());
            if is_self_closing(bytes, end) {
                if open_tags.is_empty() {
                    debug!(start = at, end, "Located self-closing SVG element");
                    spans.push(Span::new(at, end));
                }
            } else {
                open_tags.push(at);
            }
            pos = end;
        } else if tag_named(bytes, at, true, SVG) {
            let end = tag_end(bytes, at + 2 + SVG.len());
            match open_tags.pop() {
                Some(start) if open_tags.is_empty() => {
                    debug!(start, end, "Located SVG element");
                    spans.push(Span::new(start, end));
                }
                Some(_) => {}
                None => warn!(offset = at, "Ignoring </svg> without a matching opening tag"),
            }
            pos = end;
        } else if bytes.get(at + 1).is_some_and(u8::is_ascii_alphabetic) {
            // Any other opening tag: skip its attributes, which may quote `<svg`.
            pos = tag_end(bytes, at + 1);
        } else {
            pos = at + 1;
        }
    }

    if let Some(&offset) = open_tags.last() {
        return Err(Error::UnbalancedMarkup { offset });
    }

    Ok(spans)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|rel| from + rel)
}

/// Returns the offset just past the comment whose body starts at `body`.
///
/// `<!-->` and `<!--->` are complete empty comments.
fn comment_end(bytes: &[u8], body: usize) -> usize {
    let tail = bytes.get(body..).unwrap_or_default();
    if tail.starts_with(b">") {
        body + 1
    } else if tail.starts_with(b"->") {
        body + 2
    } else {
        skip_past(bytes, body, b"-->")
    }
}

/// Returns the offset just past the next `needle`, or the end of input.
fn skip_past(bytes: &[u8], from: usize, needle: &[u8]) -> usize {
    bytes
        .get(from..)
        .and_then(|tail| tail.windows(needle.len()).position(|w| w == needle))
        .map_or(bytes.len(), |rel| from + rel + needle.len())
}

/// Whether a tag named `name` (ASCII case-insensitive) starts at `at`.
///
/// The name must be followed by whitespace, `>`, `/` or the end of input, so
/// `<svgx>` is not an SVG tag.
fn tag_named(bytes: &[u8], at: usize, closing: bool, name: &[u8]) -> bool {
    let name_start = if closing {
        if bytes.get(at + 1) != Some(&b'/') {
            return false;
        }
        at + 2
    } else {
        at + 1
    };

    let Some(candidate) = bytes.get(name_start..name_start + name.len()) else {
        return false;
    };

    candidate.eq_ignore_ascii_case(name)
        && bytes
            .get(name_start + name.len())
            .is_none_or(|b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
}

/// Returns the offset just past the `>` closing the tag that `from` is inside.
///
/// Quoted attribute values are skipped, so `<svg data-x="a>b">` ends at the
/// last `>`. An unterminated tag runs to the end of input.
fn tag_end(bytes: &[u8], from: usize) -> usize {
    let mut quote: Option<u8> = None;
    let mut prev = 0u8;

    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if (b == b'"' || b == b'\'') && prev == b'=' => quote = Some(b),
            None if b == b'>' => return i + 1,
            None => {}
        }
        if !b.is_ascii_whitespace() {
            prev = b;
        }
    }

    bytes.len()
}

fn is_self_closing(bytes: &[u8], tag_end: usize) -> bool {
    if tag_end == 0 || bytes[tag_end - 1] != b'>' {
        return false;
    }
    bytes[..tag_end - 1]
        .iter()
        .rev()
        .find(|b| !b.is_ascii_whitespace())
        == Some(&b'/')
}

/// Skips the body of a raw-text element and its closing tag.
fn skip_raw_text(bytes: &[u8], from: usize, name: &[u8]) -> usize {
    let mut pos = from;
    while let Some(at) = find_byte(bytes, pos, b'<') {
        if tag_named(bytes, at, true, name) {
            return tag_end(bytes, at + 2 + name.len());
        }
        pos = at + 1;
    }
    bytes.len()
}
