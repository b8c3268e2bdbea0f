//! Restore command implementation
//!
//! Puts the original SVGs back into a placeholder document. Placeholders that
//! cannot be matched are left in place and reported; they never fail the
//! command.

use std::path::Path;

use colored::Colorize;
use serde_json::{Value, json};

use svg_blocks::{PlaceholderIssue, ResolutionReport, RestoreOptions, restore};
use svg_fs::io;

use super::load_records;
use crate::config::{Settings, validate_confidence};
use crate::error::Result;

/// Run the restore command
pub fn run_restore(
    input: &Path,
    svg_data: &Path,
    output: Option<&Path>,
    min_confidence: Option<f64>,
    json: bool,
    settings: &Settings,
) -> Result<()> {
    let min_confidence = min_confidence.unwrap_or(settings.restore.min_confidence);
    validate_confidence(min_confidence)?;
    let output = output.unwrap_or(settings.restore.output.as_path());

    let html = io::read_text(input)?;
    let (_, records) = load_records(svg_data)?;

    let restoration = restore(&html, &records, &RestoreOptions { min_confidence });
    io::write_text(output, &restoration.html)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report_json(&restoration.report, output))?
        );
    } else {
        print_report(&restoration.report, output);
    }

    Ok(())
}

fn report_json(report: &ResolutionReport, output: &Path) -> Value {
    json!({
        "output": output.display().to_string(),
        "exact": report.exact,
        "context_matched": report.context_matched,
        "unresolved": report.unresolved.iter().map(issue_json).collect::<Vec<_>>(),
        "corrupt": report.corrupt.iter().map(issue_json).collect::<Vec<_>>(),
        "success": report.is_clean(),
    })
}

fn issue_json(issue: &PlaceholderIssue) -> Value {
    match issue {
        PlaceholderIssue::Unresolved {
            id,
            offset,
            best_score,
        } => json!({ "id": id, "offset": offset, "best_score": best_score }),
        PlaceholderIssue::Corrupt { offset, reason } => {
            json!({ "offset": offset, "reason": reason })
        }
    }
}

/// Print human-readable resolution report
fn print_report(report: &ResolutionReport, output: &Path) {
    let total = report.resolved() + report.unresolved.len();
    println!(
        "Restored {} of {} placeholders ({} by id, {} by context)",
        report.resolved(),
        total,
        report.exact,
        report.context_matched
    );

    if report.is_clean() {
        println!("{} Saved restored HTML to {}", "OK".green().bold(), output.display());
        return;
    }

    println!();
    println!("{}", "Needs attention:".yellow().bold());
    for issue in report.issues() {
        println!("  {} {}", "!".yellow(), issue);
    }
    println!();
    println!(
        "{} Saved restored HTML to {} with {} placeholder(s) left in place",
        "WARN".yellow().bold(),
        output.display(),
        report.unresolved.len() + report.corrupt.len()
    );
}
