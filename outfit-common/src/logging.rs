//! Tracing subscriber initialization for OUTFIT binaries
//!
//! Logs always go to stderr. When `logging.dir` is configured, a plain-text
//! copy is written to `<dir>/<tool>-<timestamp>.log` as well.

use crate::config::LoggingConfig;
use crate::time::log_file_name;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Returns the log file path, if any.
///
/// `RUST_LOG` overrides the configured level unless `debug` is set.
pub fn init_logging(
    tool: &str,
    config: &LoggingConfig,
    debug: bool,
    at: &NaiveDateTime,
) -> Result<Option<PathBuf>> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    let (file_layer, log_path) = match &config.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = log_file_name(dir, tool, at);
            let file = std::fs::File::create(&path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Logging initialization failed: {}", e)))?;

    Ok(log_path)
}
