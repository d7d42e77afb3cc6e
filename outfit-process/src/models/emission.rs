//! Emission coefficient and A-weighting tables

use super::{BandLevels, FrequencyBand, VehicleClass};
use crate::error::ModelError;
use outfit_common::stage::RowCount;
use outfit_common::Schema;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Emission coefficient row as stored on disk: one "Ar;Br;Ap;Bp" cell per band
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCoefficientRow {
    pub vehicle_type: String,
    #[serde(rename = "63")]
    pub hz63: String,
    #[serde(rename = "125")]
    pub hz125: String,
    #[serde(rename = "250")]
    pub hz250: String,
    #[serde(rename = "500")]
    pub hz500: String,
    #[serde(rename = "1000")]
    pub hz1000: String,
    #[serde(rename = "2000")]
    pub hz2000: String,
    #[serde(rename = "4000")]
    pub hz4000: String,
    #[serde(rename = "8000")]
    pub hz8000: String,
}

impl Schema for RawCoefficientRow {
    const NAME: &'static str = "frequency coefficients";
    const COLUMNS: &'static [&'static str] = &[
        "vehicle_type", "63", "125", "250", "500", "1000", "2000", "4000", "8000",
    ];
}

impl RawCoefficientRow {
    pub fn cells(&self) -> BandLevels<&str> {
        BandLevels::new([
            self.hz63.as_str(),
            self.hz125.as_str(),
            self.hz250.as_str(),
            self.hz500.as_str(),
            self.hz1000.as_str(),
            self.hz2000.as_str(),
            self.hz4000.as_str(),
            self.hz8000.as_str(),
        ])
    }
}

/// Rolling (Ar, Br) and propulsion (Ap, Bp) noise coefficients for one band
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoefficientSet {
    pub ar: f64,
    pub br: f64,
    pub ap: f64,
    pub bp: f64,
}

impl CoefficientSet {
    pub fn new(ar: f64, br: f64, ap: f64, bp: f64) -> Self {
        Self { ar, br, ap, bp }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.ar, self.br, self.ap, self.bp]
    }
}

/// Serializes to the on-disk "Ar;Br;Ap;Bp" form
impl fmt::Display for CoefficientSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{};{}", self.ar, self.br, self.ap, self.bp)
    }
}

/// Parsed emission coefficients per vehicle class and band
#[derive(Debug, Clone, Default)]
pub struct EmissionCoefficients {
    classes: HashMap<VehicleClass, BandLevels<CoefficientSet>>,
}

impl EmissionCoefficients {
    pub fn new(classes: HashMap<VehicleClass, BandLevels<CoefficientSet>>) -> Self {
        Self { classes }
    }

    pub fn get(&self, class: VehicleClass) -> Option<&BandLevels<CoefficientSet>> {
        self.classes.get(&class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl RowCount for EmissionCoefficients {
    fn row_count(&self) -> usize {
        self.classes.len()
    }
}

/// A-weighting row as stored on disk
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAWeighting {
    #[serde(rename = "63")]
    pub hz63: f64,
    #[serde(rename = "125")]
    pub hz125: f64,
    #[serde(rename = "250")]
    pub hz250: f64,
    #[serde(rename = "500")]
    pub hz500: f64,
    #[serde(rename = "1000")]
    pub hz1000: f64,
    #[serde(rename = "2000")]
    pub hz2000: f64,
    #[serde(rename = "4000")]
    pub hz4000: f64,
    #[serde(rename = "8000")]
    pub hz8000: f64,
}

impl Schema for RawAWeighting {
    const NAME: &'static str = "A-weighting curve";
    const COLUMNS: &'static [&'static str] = &FrequencyBand::LABELS;
}

/// A-weighting correction (dB) per band, applied to every row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AWeightingCurve(pub BandLevels<f64>);

impl TryFrom<&RawAWeighting> for AWeightingCurve {
    type Error = ModelError;

    fn try_from(raw: &RawAWeighting) -> Result<Self, Self::Error> {
        let values = BandLevels::new([
            raw.hz63, raw.hz125, raw.hz250, raw.hz500, raw.hz1000, raw.hz2000, raw.hz4000,
            raw.hz8000,
        ]);
        if let Some((band, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteAWeighting { band, value: *value });
        }
        Ok(AWeightingCurve(values))
    }
}

impl AWeightingCurve {
    pub fn correction(&self, band: FrequencyBand) -> f64 {
        self.0[band]
    }
}

impl RowCount for AWeightingCurve {
    fn row_count(&self) -> usize {
        1
    }
}
