//! filecensus - ranked file-type census of a directory tree.
//!
//! Usage:
//!   filecensus <PATH>                Scan and report the top categories
//!   filecensus -n 4 <PATH>           Cap the worker budget at 4
//!   filecensus --format json <PATH>  Emit the full census as JSON
//!   filecensus --help                Show help

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use filecensus_core::{Census, CensusConfig, ScanError};
use filecensus_scan::Scanner;

#[derive(Parser)]
#[command(
    name = "filecensus",
    version,
    about = "Ranked file-type census of a directory tree",
    long_about = "filecensus walks a directory tree with a budgeted pool of \
                  worker threads, classifies every regular file by content, \
                  and reports the most frequent categories."
)]
struct Cli {
    /// Directory to scan
    path: PathBuf,

    /// Worker budget (0 = fully sequential; default: hardware parallelism)
    #[arg(short = 'n', long = "workers")]
    workers: Option<usize>,

    /// Number of top categories to report
    #[arg(short, long, default_value = "10")]
    top: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    let config = CensusConfig::builder()
        .root(cli.path)
        .workers(cli.workers)
        .top(cli.top)
        .build()
        .map_err(ScanError::from)
        .context("Invalid configuration")?;

    eprintln!(
        "Scanning {} (workers: {})",
        config.root.display(),
        config.effective_workers()
    );

    let census = Scanner::new().scan(&config);

    match cli.format {
        OutputFormat::Text => print_report(&census, config.top),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&census)?),
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Print the ranked report, 1-indexed.
fn print_report(census: &Census, top_n: usize) {
    println!(
        "{} entries, {} directories in {:.2}s",
        census.stats.entries_scanned,
        census.stats.dirs_scanned,
        census.scan_duration.as_secs_f64()
    );

    let ranked = census.top(top_n);
    println!("Top {} file types:", ranked.len());
    for (i, (label, count)) in ranked.iter().enumerate() {
        println!("{})\t{}: {}", i + 1, label, count);
    }
}
