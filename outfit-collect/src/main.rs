//! Travel-time collector (outfit-collect) - Main entry point
//!
//! Reads a road segment table, asks the directions service for the current
//! travel time of each segment and writes `<dir>/<prefix>-<timestamp>.csv`.
//!
//! Exit codes: 1 input missing, 2 blank prefix, 3 output directory missing,
//! 4 configuration or collection failure.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use outfit_collect::{collect_observations, resolve_api_key, DirectionsClient, SegmentRow};
use outfit_common::config::{load_config, TomlConfig};
use outfit_common::logging::init_logging;
use outfit_common::{read_records, time, write_records};
use tracing::{error, info};

const EXIT_MISSING_INPUT: u8 = 1;
const EXIT_BLANK_PREFIX: u8 = 2;
const EXIT_MISSING_DIR: u8 = 3;
const EXIT_FAILURE: u8 = 4;

/// Command-line arguments for outfit-collect
#[derive(Parser, Debug)]
#[command(name = "outfit-collect")]
#[command(about = "Collect travel times for road segments from a directions service")]
#[command(version)]
struct Args {
    /// Road segment table (.csv or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Output file name prefix
    #[arg(short, long)]
    prefix: String,

    /// Configuration file
    #[arg(long, env = "OUTFIT_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let now = time::now();
    let args = Args::parse();

    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match init_logging("collect", &loaded.config.logging, args.debug, &now.naive_local()) {
        Ok(Some(path)) => info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    }
    loaded.log_resolution();
    let config = loaded.config;

    if !args.input.is_file() {
        error!("The input file does not exist: {}", args.input.display());
        return ExitCode::from(EXIT_MISSING_INPUT);
    }
    if args.prefix.trim().is_empty() {
        error!("The prefix has not been specified");
        return ExitCode::from(EXIT_BLANK_PREFIX);
    }
    if !args.dir.is_dir() {
        error!("The output directory does not exist: {}", args.dir.display());
        return ExitCode::from(EXIT_MISSING_DIR);
    }

    match run(&args, &config, now).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(args: &Args, config: &TomlConfig, now: DateTime<Local>) -> Result<()> {
    let output = time::output_file_name(&args.dir, args.prefix.trim(), &now.naive_local());
    info!(
        "Processing started: input={}, output={}",
        args.input.display(),
        output.display()
    );

    let segments: Vec<SegmentRow> = read_records(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let api_key = resolve_api_key(&config.directions)?;
    let client = DirectionsClient::new(&config.directions, api_key)
        .context("Failed to create directions client")?;

    let observations = collect_observations(&segments, &now, |origin, destination| {
        let client = &client;
        async move { client.route(&origin, &destination).await }
    })
    .await;

    write_records(&output, &observations, false)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} observations to {}", observations.len(), output.display());
    Ok(())
}
