//! # OUTFIT Common Library
//!
//! Shared code for the OUTFIT traffic-noise tools including:
//! - Error type shared by the table and configuration layers
//! - TOML configuration loading and resolution
//! - Logging initialization
//! - Stage instrumentation (timing and row counts)
//! - Generic table I/O (CSV/JSON with extension dispatch)
//! - Traffic observation model exchanged between collection and processing

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod stage;
pub mod table;
pub mod time;

pub use error::{Error, Result};
pub use models::{Daytime, TrafficObservation};
pub use stage::{observe_stage, StageObserver, StageReport, TracingObserver};
pub use table::{read_records, write_records, Schema, Table, TableFormat, ToRow};
