//! Data models for the noise model

pub mod attenuation;
pub mod bands;
pub mod emission;
pub mod rows;
pub mod street;
pub mod vehicle;

pub use attenuation::{AttenuationEntry, AttenuationMatrix, RawAttenuationRow, ReceiverPoint};
pub use bands::{BandLevels, FrequencyBand};
pub use emission::{
    AWeightingCurve, CoefficientSet, EmissionCoefficients, RawAWeighting, RawCoefficientRow,
};
pub use rows::{AttenuatedRow, FlowEstimate, ReceiverLevel, SoundPowerRow};
pub use street::{RawStreetParams, StreetParameter, StreetParameterIndex};
pub use vehicle::VehicleClass;
