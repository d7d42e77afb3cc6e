//! Common error types for OUTFIT

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for OUTFIT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across OUTFIT tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON read/write error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet read/write error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow record batch error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// File extension not handled by the table layer
    #[error("Unknown file format: {}", .0.display())]
    UnknownFormat(PathBuf),

    /// Table lacks one or more required columns
    #[error("Table '{table}' is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        table: String,
        columns: Vec<String>,
    },

    /// Refusing to overwrite an existing output file
    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid value in an input table
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
