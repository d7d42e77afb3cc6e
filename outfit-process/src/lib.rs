//! outfit-process library interface
//!
//! Traffic-noise model: observations of travel time on road segments become
//! octave-band sound pressure levels at fixed receivers.
//!
//! Static tables are normalized once into a [`ModelContext`]; each
//! observation table then runs through [`pipeline::run_batch`].

pub mod acoustics;
pub mod context;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;

pub use crate::context::{ModelContext, StaticTables};
pub use crate::error::{ModelError, ModelResult};
pub use crate::pipeline::{process_file, run_batch, BatchTables};
