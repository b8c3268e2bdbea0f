//! Command implementations for svg-cli

pub mod extract;
pub mod restore;
pub mod stats;

pub use extract::run_extract;
pub use restore::run_restore;
pub use stats::run_stats;

use std::path::Path;

use svg_blocks::{RecordFile, RecordMetadata, RecordSet};
use svg_fs::ConfigStore;

use crate::error::Result;

/// Load and validate a record file.
fn load_records(path: &Path) -> Result<(RecordMetadata, RecordSet)> {
    let file: RecordFile = ConfigStore::new().load(path)?;
    let metadata = file.metadata.clone();
    let records = file.into_record_set()?;
    tracing::info!(
        path = %path.display(),
        count = records.len(),
        extraction_date = %metadata.extraction_date,
        "Loaded SVG records"
    );
    Ok((metadata, records))
}
