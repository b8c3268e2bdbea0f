//! Extraction and restoration of whole documents.

use tracing::{debug, info};

use crate::context::{DEFAULT_CONTEXT_CHARS, extract_context};
use crate::error::Result;
use crate::identifier::generate_id;
use crate::locator::locate_spans;
use crate::placeholder::{PlaceholderBlock, decode_blocks, encode_block};
use crate::reassemble::{Replacement, reassemble, splice};
use crate::record::{RecordSet, SvgRecord};
use crate::resolver::{DEFAULT_MIN_CONFIDENCE, Resolution, ResolutionReport, resolve_blocks};

/// Options for [`extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Context window length in characters.
    pub context_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }
}

/// Options for [`restore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreOptions {
    /// Minimum context score, in `[0, 1]`, accepted by the fallback matcher.
    pub min_confidence: f64,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Output of [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The document with every SVG element replaced by a placeholder block.
    pub modified_html: String,
    /// One record per replaced element, in document order.
    pub records: Vec<SvgRecord>,
}

/// A placeholder block together with how it was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockOutcome {
    pub block: PlaceholderBlock,
    pub resolution: Resolution,
}

/// Output of [`restore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Restoration {
    /// The document with every resolved placeholder replaced by its SVG.
    pub html: String,
    /// Per-block outcomes in document order.
    pub outcomes: Vec<BlockOutcome>,
    pub report: ResolutionReport,
}

/// Replaces every top-level SVG element in `source` with a placeholder block.
///
/// # Errors
///
/// Returns [`Error::UnbalancedMarkup`](crate::Error::UnbalancedMarkup) if an
/// SVG element is never closed. Nothing is extracted in that case.
pub fn extract(source: &str, options: &ExtractOptions) -> Result<Extraction> {
    let spans = locate_spans(source)?;

    let mut records = Vec::with_capacity(spans.len());
    let mut blocks = Vec::with_capacity(spans.len());

    for (index, span) in spans.into_iter().enumerate() {
        let svg_content = source[span.range()].to_string();
        let id = generate_id(index, &svg_content);
        let (context_before, context_after) = extract_context(source, span, options.context_chars);
        debug!(%id, start = span.start, end = span.end, "Extracting SVG element");

        blocks.push(encode_block(&id, &context_before, &context_after));
        records.push(SvgRecord {
            id,
            index,
            svg_content,
            context_before,
            context_after,
            original_position: span,
        });
    }

    let replacements = records
        .iter()
        .zip(&blocks)
        .map(|(record, block)| Replacement {
            range: record.original_position.range(),
            text: block.as_str(),
        })
        .collect();
    let modified_html = splice(source, replacements);

    info!(count = records.len(), "Extracted SVG elements");
    Ok(Extraction {
        modified_html,
        records,
    })
}

/// Re-inserts SVG content into a placeholder document.
///
/// Never fails: corrupt and unresolved placeholders are left in the output
/// verbatim and listed in the returned report.
pub fn restore(source: &str, records: &RecordSet, options: &RestoreOptions) -> Restoration {
    let decoded = decode_blocks(source);
    let resolutions = resolve_blocks(&decoded.blocks, records, options.min_confidence);
    let html = reassemble(source, &decoded.blocks, &resolutions, records);
    let report = ResolutionReport::new(&decoded.blocks, &resolutions, decoded.issues);

    info!(
        exact = report.exact,
        context_matched = report.context_matched,
        unresolved = report.unresolved.len(),
        corrupt = report.corrupt.len(),
        "Restored SVG elements"
    );

    let outcomes = decoded
        .blocks
        .into_iter()
        .zip(resolutions)
        .map(|(block, resolution)| BlockOutcome { block, resolution })
        .collect();

    Restoration {
        html,
        outcomes,
        report,
    }
}
