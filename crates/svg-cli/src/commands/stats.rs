//! Stats command implementation

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use svg_blocks::{RecordStats, stats};

use super::load_records;
use crate::error::Result;

/// Number of records listed individually.
const DETAIL_LIMIT: usize = 10;

/// Run the stats command
pub fn run_stats(svg_data: &Path, json: bool) -> Result<()> {
    let (metadata, records) = load_records(svg_data)?;
    let summary = stats(records.records());

    if json {
        let json_output = json!({
            "metadata": metadata,
            "stats": summary,
            "svgs": records.iter()
                .map(|r| json!({ "id": r.id, "index": r.index, "size": r.svg_content.len() }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }

    println!(
        "Loaded {} SVG elements from {}",
        records.len(),
        svg_data.display()
    );
    println!("  {}: {}", "Extraction date".dimmed(), metadata.extraction_date);
    println!();
    print_summary(&summary);

    if !records.is_empty() {
        println!();
        println!("{}", "SVG Details:".bold());
        for (i, record) in records.iter().take(DETAIL_LIMIT).enumerate() {
            println!(
                "  {}. ID: {}, Size: {} bytes",
                i + 1,
                record.id.cyan(),
                record.svg_content.len()
            );
        }
        if records.len() > DETAIL_LIMIT {
            println!("  ... and {} more", records.len() - DETAIL_LIMIT);
        }
    }

    Ok(())
}

/// Print the size summary shared by `extract` and `stats`.
pub fn print_summary(summary: &RecordStats) {
    println!("{}", "Statistics:".bold());
    println!("  Total SVGs: {}", summary.total);
    if summary.total > 0 {
        println!("  Total size: {} bytes", summary.total_size);
        println!("  Average size: {:.0} bytes", summary.avg_size);
        println!(
            "  Size range: {} - {} bytes",
            summary.min_size, summary.max_size
        );
    }
}
