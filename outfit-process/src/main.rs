//! Traffic noise model (outfit-process) - Main entry point
//!
//! Reads an observation table and an attenuation matrix, runs the noise
//! model and writes one row of octave-band levels per receiver.
//!
//! Exit codes: 1 input missing, 2 matrix missing, 3 output exists (without
//! `--force`), 4 configuration or model failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use outfit_common::config::{load_config, TomlConfig};
use outfit_common::logging::init_logging;
use outfit_common::{time, TracingObserver};
use outfit_process::{process_file, ModelContext};
use tracing::{error, info};

const EXIT_MISSING_INPUT: u8 = 1;
const EXIT_MISSING_MATRIX: u8 = 2;
const EXIT_OUTPUT_EXISTS: u8 = 3;
const EXIT_FAILURE: u8 = 4;

/// Command-line arguments for outfit-process
#[derive(Parser, Debug)]
#[command(name = "outfit-process")]
#[command(about = "Estimate traffic noise levels at receivers from travel-time observations")]
#[command(version)]
struct Args {
    /// Traffic observation table (.csv or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Attenuation matrix exported by the propagation tool
    #[arg(short, long)]
    matrix: PathBuf,

    /// Receiver level table to write (.csv or .json)
    #[arg(short, long)]
    output: PathBuf,

    /// Overwrite the output table if it exists
    #[arg(short, long)]
    force: bool,

    /// Configuration file
    #[arg(long, env = "OUTFIT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of the static parameter tables (overrides the configuration)
    #[arg(long)]
    params_dir: Option<PathBuf>,

    /// Write every intermediate stage table to this directory
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let started = time::now().naive_local();
    match init_logging("outfit-process", &loaded.config.logging, args.debug, &started) {
        Ok(Some(path)) => info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    }
    loaded.log_resolution();
    let config = loaded.config;

    if let Some(code) = check_paths(&args) {
        return ExitCode::from(code);
    }

    match run(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Argument checks done before any table is read
fn check_paths(args: &Args) -> Option<u8> {
    if !args.input.is_file() {
        error!("Input file not found: {}", args.input.display());
        return Some(EXIT_MISSING_INPUT);
    }
    if !args.matrix.is_file() {
        error!("Attenuation matrix not found: {}", args.matrix.display());
        return Some(EXIT_MISSING_MATRIX);
    }
    if args.output.exists() && !args.force {
        error!(
            "Output file {} already exists (use --force to overwrite)",
            args.output.display()
        );
        return Some(EXIT_OUTPUT_EXISTS);
    }
    None
}

fn dump_dir(args: &Args, config: &TomlConfig) -> Option<PathBuf> {
    if let Some(dir) = &args.dump_dir {
        return Some(dir.clone());
    }
    config.dump_stages.then(|| {
        args.output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    })
}

fn run(args: &Args, mut config: TomlConfig) -> Result<()> {
    if let Some(dir) = &args.params_dir {
        config.params_dir = dir.clone();
    }
    info!("Parameter tables: {}", config.params_dir.display());

    let observer = TracingObserver;
    let context = ModelContext::load(&config, &args.matrix, &observer)
        .context("Failed to prepare model parameters")?;

    let tables = process_file(&context, &args.input, &args.output, args.force, &observer)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    if let Some(dir) = dump_dir(args, &config) {
        tables
            .dump(&dir)
            .with_context(|| format!("Failed to dump stage tables to {}", dir.display()))?;
    }

    info!(
        "Wrote {} receivers to {}",
        tables.receivers.len(),
        args.output.display()
    );
    Ok(())
}
