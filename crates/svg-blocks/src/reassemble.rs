//! Document rewriting by non-overlapping range substitution.
//!
//! Both directions of the engine reduce to the same operation: extraction
//! replaces SVG spans with placeholder blocks, restoration replaces
//! placeholder blocks with SVG content. Substitutions are applied from the
//! highest offset down, so offsets computed against the input stay valid.

use std::ops::Range;

use crate::placeholder::PlaceholderBlock;
use crate::record::RecordSet;
use crate::resolver::Resolution;

/// Replace the bytes in `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement<'a> {
    pub range: Range<usize>,
    pub text: &'a str,
}

/// Applies `replacements` to `source` in reverse document order.
///
/// Ranges must lie on character boundaries and must not overlap.
pub fn splice(source: &str, mut replacements: Vec<Replacement<'_>>) -> String {
    replacements.sort_by_key(|r| r.range.start);
    debug_assert!(
        replacements
            .windows(2)
            .all(|pair| pair[0].range.end <= pair[1].range.start),
        "replacement ranges overlap"
    );

    let grown: usize = replacements.iter().map(|r| r.text.len()).sum();
    let mut out = String::with_capacity(source.len() + grown);
    out.push_str(source);

    for replacement in replacements.iter().rev() {
        out.replace_range(replacement.range.clone(), replacement.text);
    }
    out
}

/// Substitutes every resolved block with its record's content.
///
/// Unresolved blocks are left verbatim. `resolutions` is aligned with
/// `blocks`.
pub fn reassemble(
    source: &str,
    blocks: &[PlaceholderBlock],
    resolutions: &[Resolution],
    records: &RecordSet,
) -> String {
    let replacements = blocks
        .iter()
        .zip(resolutions)
        .filter_map(|(block, resolution)| {
            let record = &records.records()[resolution.record()?];
            Some(Replacement {
                range: block.span.clone(),
                text: record.svg_content.as_str(),
            })
        })
        .collect();

    splice(source, replacements)
}
