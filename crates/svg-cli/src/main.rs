//! SVG Manager CLI
//!
//! Extracts inline SVGs from HTML documents into a JSON record file and
//! restores them afterwards.

mod cli;
mod commands;
mod config;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use config::Settings;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command else {
        // No command provided - show help hint
        println!("{} SVG Manager CLI", "svgm".green().bold());
        println!();
        println!("Run {} for available commands.", "svgm --help".cyan());
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let settings = Settings::load(cli.config.as_deref(), &cwd)?;
    execute_command(command, &settings)
}

fn execute_command(cmd: Commands, settings: &Settings) -> Result<()> {
    match cmd {
        Commands::Extract {
            input,
            output,
            html_output,
            context,
        } => commands::run_extract(
            &input,
            output.as_deref(),
            html_output.as_deref(),
            context,
            settings,
        ),
        Commands::Restore {
            input,
            svg_data,
            output,
            min_confidence,
            json,
        } => commands::run_restore(
            &input,
            &svg_data,
            output.as_deref(),
            min_confidence,
            json,
            settings,
        ),
        Commands::Stats { svg_data, json } => commands::run_stats(&svg_data, json),
    }
}
