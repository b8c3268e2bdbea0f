//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SVG Manager - Extract inline SVGs from HTML and restore them later
#[derive(Parser, Debug)]
#[command(name = "svgm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./svgm.toml when present)
    #[arg(short, long, global = true, env = "SVGM_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Extract SVGs from an HTML file
    ///
    /// Replaces every inline <svg> element with a placeholder and writes the
    /// original markup to a JSON record file.
    ///
    /// Examples:
    ///   svgm extract index.html                      # svgs.json + index_with_placeholders.html
    ///   svgm extract index.html -o icons.json        # Custom record file
    ///   svgm extract index.html --context 80         # Shorter context windows
    Extract {
        /// Input HTML file
        input: PathBuf,

        /// Output JSON file for SVG records
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output HTML file with placeholders
        #[arg(long)]
        html_output: Option<PathBuf>,

        /// Number of context characters captured around each SVG
        #[arg(long)]
        context: Option<usize>,
    },

    /// Restore SVGs into an HTML file with placeholders
    ///
    /// Examples:
    ///   svgm restore index_with_placeholders.html svgs.json -o index.html
    Restore {
        /// Input HTML file with placeholders
        input: PathBuf,

        /// JSON file containing SVG records
        svg_data: PathBuf,

        /// Output HTML file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum context similarity (0.0-1.0) for placeholders without a usable id
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Print the resolution report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show statistics about extracted SVGs
    Stats {
        /// JSON file containing SVG records
        svg_data: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
