//! SVG extraction and restoration for SVG Manager.
//!
//! This crate moves inline SVG markup out of an HTML document and back in
//! again. [`extract`] replaces every top-level `<svg>` element with a
//! placeholder block and returns one [`SvgRecord`] per element; [`restore`]
//! finds the placeholder blocks in a (possibly edited) copy of the document
//! and puts the original markup back.
//!
//! ```text
//! <!-- SVG_PLACEHOLDER_START:0000_1a2b3c4d -->
//! <!-- CONTEXT_BEFORE: text before the element -->
//! <!-- CONTEXT_AFTER: text after the element -->
//! <span class="svg-placeholder" data-svg-id="0000_1a2b3c4d"></span>
//! <!-- SVG_PLACEHOLDER_END:0000_1a2b3c4d -->
//! ```
//!
//! Placeholders are matched to records by identifier. When an identifier has
//! been lost or mangled, the context comments are compared against the
//! records' stored context windows instead; see [`resolver`].
//!
//! Extracting and then restoring an unedited document reproduces it byte for
//! byte.

pub mod context;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod locator;
pub mod placeholder;
pub mod reassemble;
pub mod record;
pub mod resolver;
pub mod stats;

pub use context::DEFAULT_CONTEXT_CHARS;
pub use engine::{
    BlockOutcome, ExtractOptions, Extraction, RestoreOptions, Restoration, extract, restore,
};
pub use error::{Error, PlaceholderIssue, Result};
pub use locator::{Span, locate_spans};
pub use placeholder::{PlaceholderBlock, decode_blocks, encode_block};
pub use record::{RecordFile, RecordMetadata, RecordSet, SvgRecord};
pub use resolver::{DEFAULT_MIN_CONFIDENCE, Resolution, ResolutionReport};
pub use stats::{RecordStats, stats};
