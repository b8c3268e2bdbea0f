//! Mapping decoded placeholder blocks back to stored records.
//!
//! Resolution runs in two passes over the blocks in document order:
//!
//! 1. **Exact**: a block whose identifier names a record that has not been
//!    claimed yet resolves to it.
//! 2. **Context**: every remaining block is scored against each unclaimed
//!    record by comparing context windows. The best candidate wins if its
//!    score reaches the confidence threshold; otherwise the block is reported
//!    as unresolved.
//!
//! A record is claimed by at most one block, so duplicated placeholders and
//! byte-identical SVGs never collapse onto the same record.

use similar::TextDiff;
use tracing::{debug, warn};

use crate::context::comparable;
use crate::error::PlaceholderIssue;
use crate::placeholder::PlaceholderBlock;
use crate::record::RecordSet;

/// Default minimum context score for a fallback match.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// Scores closer than this are treated as equal.
const SCORE_EPSILON: f64 = 1e-9;

/// Outcome for a single placeholder block.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Identifier lookup. `record` is a position in [`RecordSet::records`].
    Exact { record: usize },
    /// Context similarity fallback.
    Context { record: usize, score: f64 },
    /// No candidate reached the threshold.
    Unresolved { best_score: f64 },
}

impl Resolution {
    /// Position of the resolved record, if any.
    pub fn record(&self) -> Option<usize> {
        match self {
            Self::Exact { record } | Self::Context { record, .. } => Some(*record),
            Self::Unresolved { .. } => None,
        }
    }
}

/// Summary of a restoration pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    /// Blocks resolved by identifier.
    pub exact: usize,
    /// Blocks resolved by context similarity.
    pub context_matched: usize,
    /// Blocks left in place because nothing matched well enough.
    pub unresolved: Vec<PlaceholderIssue>,
    /// Malformed marker pairs left in place.
    pub corrupt: Vec<PlaceholderIssue>,
}

impl ResolutionReport {
    pub fn new(
        blocks: &[PlaceholderBlock],
        resolutions: &[Resolution],
        corrupt: Vec<PlaceholderIssue>,
    ) -> Self {
        let mut report = Self {
            corrupt,
            ..Self::default()
        };

        for (block, resolution) in blocks.iter().zip(resolutions) {
            match resolution {
                Resolution::Exact { .. } => report.exact += 1,
                Resolution::Context { .. } => report.context_matched += 1,
                Resolution::Unresolved { best_score } => {
                    report.unresolved.push(PlaceholderIssue::Unresolved {
                        id: block.id.clone(),
                        offset: block.span.start,
                        best_score: *best_score,
                    })
                }
            }
        }

        report
    }

    /// Number of blocks restored either way.
    pub fn resolved(&self) -> usize {
        self.exact + self.context_matched
    }

    /// True when every placeholder was restored and none was malformed.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.corrupt.is_empty()
    }

    /// Identifiers of the unresolved blocks; `None` for blocks without one.
    pub fn unresolved_ids(&self) -> Vec<Option<&str>> {
        self.unresolved
            .iter()
            .map(|issue| match issue {
                PlaceholderIssue::Unresolved { id, .. } => id.as_deref(),
                PlaceholderIssue::Corrupt { .. } => None,
            })
            .collect()
    }

    /// All per-block problems, ordered by offset.
    pub fn issues(&self) -> Vec<&PlaceholderIssue> {
        let mut issues: Vec<_> = self.unresolved.iter().chain(&self.corrupt).collect();
        issues.sort_by_key(|issue| issue.offset());
        issues
    }
}

/// Resolves each block to a record. The result is aligned with `blocks`.
pub fn resolve_blocks(
    blocks: &[PlaceholderBlock],
    records: &RecordSet,
    min_confidence: f64,
) -> Vec<Resolution> {
    let mut claimed = vec![false; records.len()];
    let mut resolutions: Vec<Option<Resolution>> = vec![None; blocks.len()];

    for (slot, block) in resolutions.iter_mut().zip(blocks) {
        let Some(pos) = block.id.as_deref().and_then(|id| records.position(id)) else {
            continue;
        };
        if claimed[pos] {
            debug!(id = ?block.id, "Identifier already claimed, falling back to context");
            continue;
        }
        claimed[pos] = true;
        *slot = Some(Resolution::Exact { record: pos });
    }

    if resolutions.iter().all(Option::is_some) {
        return resolutions.into_iter().flatten().collect();
    }

    let windows: Vec<(String, String)> = records
        .iter()
        .map(|r| (comparable(&r.context_before), comparable(&r.context_after)))
        .collect();

    for i in 0..blocks.len() {
        if resolutions[i].is_some() {
            continue;
        }
        let block = &blocks[i];
        let before = comparable(&block.context_before);
        let after = comparable(&block.context_after);
        let expected = expected_index(&resolutions, records, i);

        let mut best: Option<(usize, f64)> = None;
        for (pos, record) in records.iter().enumerate() {
            if claimed[pos] {
                continue;
            }
            let score = (similarity(&before, &windows[pos].0) + similarity(&after, &windows[pos].1)) / 2.0;
            let better = match best {
                None => true,
                Some((best_pos, best_score)) => {
                    score > best_score + SCORE_EPSILON
                        || ((score - best_score).abs() <= SCORE_EPSILON
                            && record.index.abs_diff(expected)
                                < records.records()[best_pos].index.abs_diff(expected))
                }
            };
            if better {
                best = Some((pos, score));
            }
        }

        resolutions[i] = Some(match best {
            Some((pos, score)) if score >= min_confidence => {
                claimed[pos] = true;
                debug!(id = ?block.id, record = %records.records()[pos].id, score, "Resolved placeholder by context");
                Resolution::Context { record: pos, score }
            }
            best => {
                let best_score = best.map_or(0.0, |(_, score)| score);
                warn!(id = ?block.id, offset = block.span.start, best_score, "Placeholder left unresolved");
                Resolution::Unresolved { best_score }
            }
        });
    }

    resolutions.into_iter().flatten().collect()
}

/// Record index the block at `i` would have if the document kept its order,
/// judged from the nearest resolved neighbour.
fn expected_index(resolutions: &[Option<Resolution>], records: &RecordSet, i: usize) -> usize {
    let index_of = |j: usize| {
        resolutions[j]
            .as_ref()
            .and_then(Resolution::record)
            .map(|pos| records.records()[pos].index)
    };

    if let Some((j, index)) = (0..i).rev().find_map(|j| index_of(j).map(|index| (j, index))) {
        return index + (i - j);
    }
    if let Some((j, index)) = (i + 1..resolutions.len()).find_map(|j| index_of(j).map(|index| (j, index))) {
        return index.saturating_sub(j - i);
    }
    i
}

/// Symmetric similarity in `[0, 1]` of two context windows.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    f64::from(TextDiff::from_chars(a, b).ratio())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::generate_id;
    use crate::locator::Span;
    use crate::record::SvgRecord;

    fn record(index: usize, before: &str, after: &str) -> SvgRecord {
        let content = format!("<svg>{index}</svg>");
        SvgRecord {
            id: generate_id(index, &content),
            index,
            svg_content: content,
            context_before: before.to_string(),
            context_after: after.to_string(),
            original_position: Span::new(index * 10, index * 10 + 5),
        }
    }

    fn block(id: Option<&str>, before: &str, after: &str, start: usize) -> PlaceholderBlock {
        PlaceholderBlock {
            id: id.map(str::to_string),
            context_before: before.to_string(),
            context_after: after.to_string(),
            span: start..start + 1,
        }
    }

    fn records() -> RecordSet {
        RecordSet::new(vec![
            record(0, "<h1>Intro</h1>", "<p>First paragraph</p>"),
            record(1, "<h2>Usage</h2>", "<p>Second paragraph</p>"),
            record(2, "<h2>Footer</h2>", "<small>copyright</small>"),
        ])
        .unwrap()
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        let partial = similarity("abcdef", "abcxyz");
        assert!(partial > 0.0 && partial < 1.0);
        assert_eq!(similarity("abcdef", "abcxyz"), similarity("abcxyz", "abcdef"));
    }

    #[test]
    fn test_exact_match_by_id() {
        let set = records();
        let id = set.records()[1].id.clone();
        let resolutions = resolve_blocks(&[block(Some(&id), "", "", 0)], &set, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(resolutions, vec![Resolution::Exact { record: 1 }]);
    }

    #[test]
    fn test_missing_id_falls_back_to_context() {
        let set = records();
        let blocks = [block(None, "<h2>Usage</h2>", "<p>Second paragraph</p>", 0)];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        assert!(matches!(resolutions[0], Resolution::Context { record: 1, .. }));
    }

    #[test]
    fn test_unknown_id_falls_back_to_context() {
        let set = records();
        let blocks = [block(Some("0042_deadbeef"), "<h2>Footer</h2>", "<small>copyright</small>", 0)];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        assert!(matches!(resolutions[0], Resolution::Context { record: 2, .. }));
    }

    #[test]
    fn test_edited_context_still_matches() {
        let set = records();
        let blocks = [block(None, "<h2>Usage guide</h2>", "<p>Second paragraph!</p>", 0)];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        assert!(matches!(resolutions[0], Resolution::Context { record: 1, .. }));
    }

    #[test]
    fn test_low_confidence_is_unresolved() {
        let set = records();
        let blocks = [block(None, "zzzzzzzzzzzz", "qqqqqqqqqqqq", 7)];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        assert!(matches!(resolutions[0], Resolution::Unresolved { .. }));

        let report = ResolutionReport::new(&blocks, &resolutions, Vec::new());
        assert_eq!(report.resolved(), 0);
        assert_eq!(report.unresolved_ids(), vec![None]);
        assert_eq!(report.unresolved[0].offset(), 7);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let set = records();
        let blocks = [block(None, "<h2>Usage guide</h2>", "<p>Second paragraph!</p>", 0)];
        let resolutions = resolve_blocks(&blocks, &set, 1.0);
        assert!(matches!(resolutions[0], Resolution::Unresolved { .. }));
    }

    #[test]
    fn test_record_claimed_once() {
        let set = records();
        let id = set.records()[0].id.clone();
        // A copy-pasted placeholder: same id and context twice.
        let blocks = [
            block(Some(&id), "<h1>Intro</h1>", "<p>First paragraph</p>", 0),
            block(Some(&id), "<h1>Intro</h1>", "<p>First paragraph</p>", 10),
        ];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(resolutions[0], Resolution::Exact { record: 0 });
        assert_ne!(resolutions[1].record(), Some(0));
    }

    #[test]
    fn test_identical_contexts_tie_break_on_order() {
        let set = RecordSet::new(vec![
            record(0, "same", "same"),
            record(1, "same", "same"),
            record(2, "same", "same"),
        ])
        .unwrap();
        let blocks = [
            block(None, "same", "same", 0),
            block(None, "same", "same", 10),
            block(None, "same", "same", 20),
        ];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        let positions: Vec<_> = resolutions.iter().map(Resolution::record).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_tie_break_uses_resolved_neighbours() {
        let set = RecordSet::new(vec![
            record(0, "same", "same"),
            record(1, "x", "y"),
            record(2, "same", "same"),
        ])
        .unwrap();
        let id1 = set.records()[1].id.clone();
        // The block right after record 1 should take record 2, not record 0.
        let blocks = [
            block(Some(&id1), "x", "y", 0),
            block(None, "same", "same", 10),
        ];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        assert_eq!(resolutions[1].record(), Some(2));
    }

    #[test]
    fn test_report_counts() {
        let set = records();
        let id0 = set.records()[0].id.clone();
        let blocks = [
            block(Some(&id0), "", "", 0),
            block(None, "<h2>Footer</h2>", "<small>copyright</small>", 10),
        ];
        let resolutions = resolve_blocks(&blocks, &set, DEFAULT_MIN_CONFIDENCE);
        let corrupt = vec![PlaceholderIssue::Corrupt {
            offset: 5,
            reason: "orphan".to_string(),
        }];
        let report = ResolutionReport::new(&blocks, &resolutions, corrupt);

        assert_eq!(report.exact, 1);
        assert_eq!(report.context_matched, 1);
        assert!(report.unresolved.is_empty());
        assert_eq!(report.issues().len(), 1);
        assert!(!report.is_clean());
    }
}
