//! Table format converter (convert-table)
//!
//! Writes a CSV, JSON or Parquet copy of a table next to the input,
//! swapping the file extension.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use outfit_common::config::LoggingConfig;
use outfit_common::logging::init_logging;
use outfit_common::table::with_format_extension;
use outfit_common::{time, Table, TableFormat};
use tracing::info;

/// Command-line arguments for convert-table
#[derive(Parser, Debug)]
#[command(name = "convert-table")]
#[command(about = "Convert a table between CSV, JSON and Parquet")]
#[command(version)]
#[command(group(ArgGroup::new("format").required(true).args(["csv", "json", "parquet"])))]
struct Args {
    /// Table to convert
    input: PathBuf,

    /// Convert to CSV
    #[arg(long)]
    csv: bool,

    /// Convert to JSON
    #[arg(long)]
    json: bool,

    /// Convert to Parquet
    #[arg(long)]
    parquet: bool,

    /// Overwrite the converted file if it exists
    #[arg(short, long)]
    force: bool,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(
        "convert-table",
        &LoggingConfig::default(),
        args.debug,
        &time::now().naive_local(),
    )?;

    let target = if args.json {
        TableFormat::Json
    } else if args.parquet {
        TableFormat::Parquet
    } else {
        TableFormat::Csv
    };

    let source = TableFormat::from_path(&args.input)?;
    if source == target {
        bail!(
            "{} is already a {} table",
            args.input.display(),
            target.extension()
        );
    }

    let table = Table::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let output = with_format_extension(&args.input, target);
    table
        .write(&output, args.force)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(rows = table.len(), "Converted {} -> {}", args.input.display(), output.display());
    Ok(())
}
