//! Placeholder block encoding and decoding.
//!
//! Every extracted SVG element is replaced by a block of the form:
//!
//! ```text
//! <!-- SVG_PLACEHOLDER_START:0000_1a2b3c4d -->
//! <!-- CONTEXT_BEFORE: text before the element -->
//! <!-- CONTEXT_AFTER: text after the element -->
//! <span class="svg-placeholder" data-svg-id="0000_1a2b3c4d"></span>
//! <!-- SVG_PLACEHOLDER_END:0000_1a2b3c4d -->
//! ```
//!
//! Decoding tolerates extra whitespace inside the markers and swapped marker
//! order.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::context::sanitize_comment_text;
use crate::error::PlaceholderIssue;

/// Tag of the comment opening a placeholder block.
pub const START_TAG: &str = "SVG_PLACEHOLDER_START";
/// Tag of the comment closing a placeholder block.
pub const END_TAG: &str = "SVG_PLACEHOLDER_END";

/// Matches either marker; captures the kind and the (possibly empty) id.
static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*SVG_PLACEHOLDER_(START|END)(?:\s*:\s*([A-Za-z0-9_-]*))?\s*-->")
        .expect("Invalid placeholder marker regex")
});

static CONTEXT_BEFORE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*CONTEXT_BEFORE:(.*?)-->").expect("Invalid context regex")
});

static CONTEXT_AFTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*CONTEXT_AFTER:(.*?)-->").expect("Invalid context regex")
});

/// A placeholder block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderBlock {
    /// Identifier carried by the markers, `None` if it was removed.
    pub id: Option<String>,
    /// Content of the `CONTEXT_BEFORE` comment (empty if missing).
    pub context_before: String,
    /// Content of the `CONTEXT_AFTER` comment (empty if missing).
    pub context_after: String,
    /// Byte range from the first marker through the second.
    pub span: Range<usize>,
}

/// Result of decoding a document: valid blocks plus per-block problems.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBlocks {
    pub blocks: Vec<PlaceholderBlock>,
    pub issues: Vec<PlaceholderIssue>,
}

fn start_marker(id: &str) -> String {
    format!("<!-- {START_TAG}:{id} -->")
}

fn end_marker(id: &str) -> String {
    format!("<!-- {END_TAG}:{id} -->")
}

/// Builds the placeholder block that replaces the SVG element `id`.
///
/// The context windows are sanitized before being embedded.
pub fn encode_block(id: &str, context_before: &str, context_after: &str) -> String {
    format!(
        "{}\n<!-- CONTEXT_BEFORE: {} -->\n<!-- CONTEXT_AFTER: {} -->\n<span class=\"svg-placeholder\" data-svg-id=\"{}\"></span>\n{}",
        start_marker(id),
        sanitize_comment_text(context_before),
        sanitize_comment_text(context_after),
        id,
        end_marker(id)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Start,
    End,
}

#[derive(Debug)]
struct Marker<'a> {
    kind: MarkerKind,
    id: &'a str,
    range: Range<usize>,
}

fn find_markers(source: &str) -> Vec<Marker<'_>> {
    MARKER_REGEX
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = match caps.get(1)?.as_str() {
                "START" => MarkerKind::Start,
                _ => MarkerKind::End,
            };
            Some(Marker {
                kind,
                id: caps.get(2).map_or("", |m| m.as_str()),
                range: whole.range(),
            })
        })
        .collect()
}

/// Finds all placeholder blocks in `source`, in document order.
///
/// Adjacent markers are paired. A start marker followed by an end marker forms
/// a block; an end marker followed by a start marker is accepted only if both
/// carry the same identifier. Markers that cannot be paired, and start
/// markers whose end marker names another identifier, are reported as
/// [`PlaceholderIssue::Corrupt`] and decoding continues with the next marker.
pub fn decode_blocks(source: &str) -> DecodedBlocks {
    let markers = find_markers(source);
    let mut decoded = DecodedBlocks::default();
    let mut i = 0;

    while i < markers.len() {
        let first = &markers[i];
        let Some(second) = markers.get(i + 1) else {
            decoded.issues.push(orphan(first));
            break;
        };

        match (first.kind, second.kind) {
            (MarkerKind::Start, MarkerKind::End) => match paired_id(first.id, second.id) {
                Ok(id) => {
                    decoded.blocks.push(read_block(source, first, second, id));
                    i += 2;
                }
                Err(reason) => {
                    // Only the start marker is given up; the end marker may
                    // still open a swapped block.
                    tracing::warn!(offset = first.range.start, %reason, "Corrupt placeholder");
                    decoded.issues.push(PlaceholderIssue::Corrupt {
                        offset: first.range.start,
                        reason,
                    });
                    i += 1;
                }
            },
            (MarkerKind::End, MarkerKind::Start) if !first.id.is_empty() && first.id == second.id => {
                tracing::debug!(id = first.id, "Placeholder markers appear in swapped order");
                let id = Some(first.id.to_string());
                decoded.blocks.push(read_block(source, first, second, id));
                i += 2;
            }
            _ => {
                decoded.issues.push(orphan(first));
                i += 1;
            }
        }
    }

    decoded
}

/// Identifier for a start/end pair. A marker that lost its id does not
/// invalidate the block, but the surviving id is not trusted either.
fn paired_id(start: &str, end: &str) -> Result<Option<String>, String> {
    if start == end {
        Ok((!start.is_empty()).then(|| start.to_string()))
    } else if start.is_empty() || end.is_empty() {
        Ok(None)
    } else {
        Err(format!(
            "start marker {start} does not match end marker {end}"
        ))
    }
}

fn orphan(marker: &Marker<'_>) -> PlaceholderIssue {
    let reason = match marker.kind {
        MarkerKind::Start => format!("start marker {:?} has no matching end marker", marker.id),
        MarkerKind::End => format!("end marker {:?} has no matching start marker", marker.id),
    };
    tracing::warn!(offset = marker.range.start, %reason, "Corrupt placeholder");
    PlaceholderIssue::Corrupt {
        offset: marker.range.start,
        reason,
    }
}

fn read_block(
    source: &str,
    first: &Marker<'_>,
    second: &Marker<'_>,
    id: Option<String>,
) -> PlaceholderBlock {
    let inner = &source[first.range.end..second.range.start];
    PlaceholderBlock {
        id,
        context_before: read_context(inner, &CONTEXT_BEFORE_REGEX),
        context_after: read_context(inner, &CONTEXT_AFTER_REGEX),
        span: first.range.start..second.range.end,
    }
}

/// Reads a context comment, dropping the single space on each side that
/// [`encode_block`] adds around the text.
fn read_context(inner: &str, pattern: &Regex) -> String {
    pattern
        .captures(inner)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            let text = m.as_str();
            let text = text.strip_prefix(' ').unwrap_or(text);
            text.strip_suffix(' ').unwrap_or(text).to_string()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ID: &str = "0000_1a2b3c4d";

    #[test]
    fn test_encode_block_layout() {
        let block = encode_block(ID, "<p>A</p>", "<p>B</p>");
        assert_eq!(
            block,
            "<!-- SVG_PLACEHOLDER_START:0000_1a2b3c4d -->\n\
             <!-- CONTEXT_BEFORE: <p>A</p> -->\n\
             <!-- CONTEXT_AFTER: <p>B</p> -->\n\
             <span class=\"svg-placeholder\" data-svg-id=\"0000_1a2b3c4d\"></span>\n\
             <!-- SVG_PLACEHOLDER_END:0000_1a2b3c4d -->"
        );
    }

    #[test]
    fn test_decode_encoded_block() {
        let source = format!("head {} tail", encode_block(ID, "a -- b-", " c "));
        let decoded = decode_blocks(&source);

        assert!(decoded.issues.is_empty());
        assert_eq!(decoded.blocks.len(), 1);
        let block = &decoded.blocks[0];
        assert_eq!(block.id.as_deref(), Some(ID));
        assert_eq!(block.context_before, "a - - b-");
        assert_eq!(block.context_after, " c ");
        assert_eq!(&source[..block.span.start], "head ");
        assert_eq!(&source[block.span.end..], " tail");
    }

    #[test]
    fn test_decode_tolerates_marker_whitespace() {
        let source = "<!--SVG_PLACEHOLDER_START : 0001_aaaaaaaa-->\n\
                      <span data-svg-id=\"0001_aaaaaaaa\" class=\"x\"></span>\n\
                      <!--   SVG_PLACEHOLDER_END:0001_aaaaaaaa   -->";
        let decoded = decode_blocks(source);
        assert_eq!(decoded.blocks.len(), 1);
        assert_eq!(decoded.blocks[0].id.as_deref(), Some("0001_aaaaaaaa"));
        assert_eq!(decoded.blocks[0].context_before, "");
    }

    #[test]
    fn test_decode_missing_id_still_yields_block() {
        let source = encode_block(ID, "before", "after").replace(ID, "");
        let decoded = decode_blocks(&source);
        assert!(decoded.issues.is_empty());
        assert_eq!(decoded.blocks[0].id, None);
        assert_eq!(decoded.blocks[0].context_before, "before");
    }

    #[test]
    fn test_decode_one_marker_without_id() {
        let source = encode_block(ID, "x", "y").replacen(ID, "", 1);
        let decoded = decode_blocks(&source);
        assert_eq!(decoded.blocks.len(), 1);
        assert_eq!(decoded.blocks[0].id, None);
    }

    #[test]
    fn test_decode_mismatched_ids_is_corrupt() {
        let source = format!("{}\n{}", start_marker("0000_aaaaaaaa"), end_marker("0001_bbbbbbbb"));
        let decoded = decode_blocks(&source);
        assert!(decoded.blocks.is_empty());
        assert_eq!(decoded.issues.len(), 2);
        assert!(matches!(decoded.issues[0], PlaceholderIssue::Corrupt { offset: 0, .. }));
        assert_eq!(decoded.issues[1].offset(), source.find("<!-- SVG_PLACEHOLDER_END").unwrap());
    }

    #[test]
    fn test_mismatched_end_marker_can_open_swapped_block() {
        // Block a lost its end marker, block b has its markers swapped.
        let source = format!(
            "{}\n<p>a</p>\n{}\n<span></span>\n{}\n{}",
            start_marker("0000_aaaaaaaa"),
            end_marker("0001_bbbbbbbb"),
            start_marker("0001_bbbbbbbb"),
            encode_block("0002_cccccccc", "p", "q"),
        );
        let decoded = decode_blocks(&source);

        let ids: Vec<_> = decoded.blocks.iter().map(|b| b.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("0001_bbbbbbbb"), Some("0002_cccccccc")]);
        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].offset(), 0);
    }

    #[test]
    fn test_decode_swapped_markers() {
        let source = format!("{}\n<span></span>\n{}", end_marker(ID), start_marker(ID));
        let decoded = decode_blocks(&source);
        assert!(decoded.issues.is_empty());
        assert_eq!(decoded.blocks[0].span, 0..source.len());
    }

    #[test]
    fn test_orphan_marker_does_not_stop_decoding() {
        let second = encode_block("0001_bbbbbbbb", "p", "q");
        let source = format!("{}\n<p>gap</p>\n{}", start_marker(ID), second);
        let decoded = decode_blocks(&source);

        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].offset(), 0);
        assert_eq!(decoded.blocks.len(), 1);
        assert_eq!(decoded.blocks[0].id.as_deref(), Some("0001_bbbbbbbb"));
    }

    #[test]
    fn test_trailing_orphan_end_marker() {
        let first = encode_block(ID, "p", "q");
        let source = format!("{first}{}", end_marker("0009_cccccccc"));
        let decoded = decode_blocks(&source);
        assert_eq!(decoded.blocks.len(), 1);
        assert_eq!(decoded.issues.len(), 1);
        assert_eq!(decoded.issues[0].offset(), first.len());
    }
}
