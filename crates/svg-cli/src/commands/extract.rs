//! Extract command implementation
//!
//! Replaces inline SVGs with placeholders and stores the originals.

use std::path::{Path, PathBuf};

use chrono::Utc;
use colored::Colorize;

use svg_blocks::{ExtractOptions, RecordFile, extract, stats};
use svg_fs::{ConfigStore, io};

use super::stats::print_summary;
use crate::config::Settings;
use crate::error::Result;

/// Run the extract command
///
/// Writes the record file and the placeholder document. CLI values override
/// the settings file.
pub fn run_extract(
    input: &Path,
    output: Option<&Path>,
    html_output: Option<&Path>,
    context: Option<usize>,
    settings: &Settings,
) -> Result<()> {
    let context_chars = context.unwrap_or(settings.extract.context_chars);
    let records_path = output.unwrap_or(settings.extract.records_file.as_path());
    let html_path = html_output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| placeholder_path(input, &settings.extract.placeholder_suffix));

    println!("Extracting SVGs from {}...", input.display().to_string().cyan());
    let html = io::read_text(input)?;
    let extraction = extract(&html, &ExtractOptions { context_chars })?;

    let summary = stats(&extraction.records);
    let file = RecordFile::new(extraction.records, context_chars, Utc::now());
    ConfigStore::new().save(records_path, &file)?;

    // The record file is only kept together with its placeholder document.
    if let Err(e) = io::write_text(&html_path, &extraction.modified_html) {
        tracing::warn!(path = %records_path.display(), "Removing record file after failed HTML write");
        let _ = std::fs::remove_file(records_path);
        return Err(e.into());
    }

    println!(
        "{} Saved {} SVG elements to {}",
        "OK".green().bold(),
        file.svgs.len(),
        records_path.display()
    );
    println!(
        "{} Saved modified HTML to {}",
        "OK".green().bold(),
        html_path.display()
    );

    println!();
    print_summary(&summary);
    Ok(())
}

/// `dir/page.html` -> `dir/page<suffix>.html`
pub fn placeholder_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}{extension}"))
}
