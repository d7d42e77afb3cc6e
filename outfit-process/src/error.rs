//! Error types for the noise model
//!
//! Every variant is a hard failure that aborts the batch. Soft failures
//! (unmatched joins) never surface here; they travel through the pipeline as
//! `None` values instead.

use crate::models::{FrequencyBand, VehicleClass};
use outfit_common::Daytime;
use thiserror::Error;

/// Noise model error type
#[derive(Debug, Error)]
pub enum ModelError {
    /// Coefficient cell is not four semicolon-separated numbers
    #[error("Malformed coefficients '{value}': {reason}")]
    MalformedCoefficients { value: String, reason: String },

    /// Vehicle class code outside f1..f4
    #[error("Unknown vehicle class '{0}'")]
    UnknownVehicleClass(String),

    /// Attenuation period code outside Ld/Le/Lx/Ln (and f1..f4)
    #[error("Unknown period code '{0}' in attenuation matrix")]
    UnknownPeriodCode(String),

    /// Street parameter row whose weighted class sum is zero
    #[error("Degenerate vehicle weights for highway '{highway}' ({daytime}): weighted sum is {denominator}")]
    DegenerateWeights {
        highway: String,
        daytime: Daytime,
        denominator: f64,
    },

    /// Speed outside the domain of the emission formulas
    #[error("Non-positive speed {speed} km/h for segment '{segment}'")]
    NonPositiveSpeed { segment: String, speed: f64 },

    /// Sound power formula produced NaN or an infinite level
    #[error("Non-finite sound power {level} dB at {band} for segment '{segment}'")]
    NonFiniteSoundPower {
        segment: String,
        vehicle_class: VehicleClass,
        band: FrequencyBand,
        level: f64,
    },

    /// A-weighting cell is NaN or infinite
    #[error("Non-finite A-weighting correction {value} at {band}")]
    NonFiniteAWeighting { band: FrequencyBand, value: f64 },

    /// Flow requires coefficients that the emission table does not define
    #[error("No emission coefficients for vehicle class {0}")]
    MissingCoefficients(VehicleClass),

    /// A-weighting table has no rows
    #[error("A-weighting table is empty")]
    EmptyAWeighting,

    /// Table layer error (I/O, format, missing columns)
    #[error(transparent)]
    Common(#[from] outfit_common::Error),
}

/// Result type for noise model operations
pub type ModelResult<T> = Result<T, ModelError>;
