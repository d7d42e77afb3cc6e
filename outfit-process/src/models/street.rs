//! Street parameter tables

use super::VehicleClass;
use outfit_common::{Daytime, Schema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Street parameter row as stored on disk (one row per highway/daytime)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStreetParams {
    pub highway: String,
    /// Vehicles per hour
    pub capacity: f64,
    /// Free-flow speed in km/h
    pub free_speed: f64,
    pub daytime: Daytime,
    /// Volume-delay scale parameter
    pub alpha: f64,
    /// Volume-delay exponent
    pub beta: f64,
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
}

impl Schema for RawStreetParams {
    const NAME: &'static str = "street parameters";
    const COLUMNS: &'static [&'static str] = &[
        "highway",
        "capacity",
        "free_speed",
        "daytime",
        "alpha",
        "beta",
        "f1",
        "f2",
        "f3",
        "f4",
    ];
}

impl RawStreetParams {
    /// Raw weight input for a vehicle class
    pub fn raw_weight(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Light => self.f1,
            VehicleClass::MediumHeavy => self.f2,
            VehicleClass::Heavy => self.f3,
            VehicleClass::PoweredTwoWheeler => self.f4,
        }
    }
}

/// Normalized street parameters for one vehicle class
#[derive(Debug, Clone, PartialEq)]
pub struct StreetParameter {
    pub highway: String,
    pub capacity: f64,
    /// Free-flow speed in m/s
    pub free_speed: f64,
    pub daytime: Daytime,
    pub alpha: f64,
    pub beta: f64,
    pub vehicle_class: VehicleClass,
    /// Share of the flow belonging to this class, in [0, 1]
    pub share: f64,
}

/// Normalized street parameters keyed by (highway, daytime)
#[derive(Debug, Clone, Default)]
pub struct StreetParameterIndex {
    groups: HashMap<(String, Daytime), Vec<StreetParameter>>,
    rows: usize,
}

impl StreetParameterIndex {
    pub fn new(params: Vec<StreetParameter>) -> Self {
        let rows = params.len();
        let mut groups: HashMap<(String, Daytime), Vec<StreetParameter>> = HashMap::new();
        for param in params {
            groups
                .entry((param.highway.clone(), param.daytime))
                .or_default()
                .push(param);
        }
        Self { groups, rows }
    }

    /// Per-class rows for a highway/daytime key (empty if unknown)
    pub fn lookup(&self, highway: &str, daytime: Daytime) -> &[StreetParameter] {
        self.groups
            .get(&(highway.to_string(), daytime))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl outfit_common::stage::RowCount for StreetParameterIndex {
    fn row_count(&self) -> usize {
        self.rows
    }
}
