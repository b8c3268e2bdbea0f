//! Size statistics over a set of extracted records.

use serde::Serialize;

use crate::record::SvgRecord;

/// Aggregate sizes of `svg_content`, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordStats {
    pub total: usize,
    pub total_size: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub avg_size: f64,
}

/// Computes [`RecordStats`]; all fields are zero for an empty slice.
pub fn stats(records: &[SvgRecord]) -> RecordStats {
    let sizes = records.iter().map(|r| r.svg_content.len());
    let (Some(min_size), Some(max_size)) = (sizes.clone().min(), sizes.clone().max()) else {
        return RecordStats::default();
    };
    let total_size: usize = sizes.sum();

    RecordStats {
        total: records.len(),
        total_size,
        min_size,
        max_size,
        avg_size: total_size as f64 / records.len() as f64,
    }
}
