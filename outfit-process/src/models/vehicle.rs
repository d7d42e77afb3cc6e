//! Vehicle classes

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle classes of the emission model, identified by their table codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleClass {
    /// f1: light vehicles
    #[serde(rename = "f1")]
    Light,
    /// f2: medium-heavy vehicles
    #[serde(rename = "f2")]
    MediumHeavy,
    /// f3: heavy vehicles (not present in urban streets)
    #[serde(rename = "f3")]
    Heavy,
    /// f4: powered two-wheelers
    #[serde(rename = "f4")]
    PoweredTwoWheeler,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 4] = [
        VehicleClass::Light,
        VehicleClass::MediumHeavy,
        VehicleClass::Heavy,
        VehicleClass::PoweredTwoWheeler,
    ];

    pub fn code(self) -> &'static str {
        match self {
            VehicleClass::Light => "f1",
            VehicleClass::MediumHeavy => "f2",
            VehicleClass::Heavy => "f3",
            VehicleClass::PoweredTwoWheeler => "f4",
        }
    }

    /// Global weight applied to the raw class share during normalization
    pub fn multiplier(self) -> f64 {
        match self {
            VehicleClass::Light => 1.0,
            VehicleClass::MediumHeavy => 2.0,
            VehicleClass::Heavy => 0.0,
            VehicleClass::PoweredTwoWheeler => 0.5,
        }
    }

    /// Class tagged by a period code of the attenuation matrix export.
    ///
    /// The propagation tool only knows day/evening/peak/night periods, so the
    /// period column is reused to carry vehicle classes.
    pub fn from_period_code(code: &str) -> Option<Self> {
        match code {
            "Ld" => Some(VehicleClass::Light),
            "Le" => Some(VehicleClass::MediumHeavy),
            "Lx" => Some(VehicleClass::Heavy),
            "Ln" => Some(VehicleClass::PoweredTwoWheeler),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for VehicleClass {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim() {
            "f1" => Ok(VehicleClass::Light),
            "f2" => Ok(VehicleClass::MediumHeavy),
            "f3" => Ok(VehicleClass::Heavy),
            "f4" => Ok(VehicleClass::PoweredTwoWheeler),
            other => Err(ModelError::UnknownVehicleClass(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for class in VehicleClass::ALL {
            assert_eq!(class.code().parse::<VehicleClass>().unwrap(), class);
        }
        assert!("f5".parse::<VehicleClass>().is_err());
    }

    #[test]
    fn test_period_codes() {
        assert_eq!(VehicleClass::from_period_code("Ld"), Some(VehicleClass::Light));
        assert_eq!(VehicleClass::from_period_code("Le"), Some(VehicleClass::MediumHeavy));
        assert_eq!(VehicleClass::from_period_code("Lx"), Some(VehicleClass::Heavy));
        assert_eq!(VehicleClass::from_period_code("Ln"), Some(VehicleClass::PoweredTwoWheeler));
        assert_eq!(VehicleClass::from_period_code("Lden"), None);
    }

    #[test]
    fn test_heavy_vehicles_weightless() {
        assert_eq!(VehicleClass::Heavy.multiplier(), 0.0);
    }
}
