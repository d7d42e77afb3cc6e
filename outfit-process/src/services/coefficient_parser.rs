//! Emission coefficient parsing
//!
//! Each band cell of the coefficient table holds the four curve
//! coefficients as `Ar;Br;Ap;Bp`.

use crate::error::{ModelError, ModelResult};
use crate::models::{
    BandLevels, CoefficientSet, EmissionCoefficients, RawCoefficientRow, VehicleClass,
};
use std::collections::HashMap;
use tracing::warn;

const TOKENS: usize = 4;

/// Parse one `Ar;Br;Ap;Bp` cell
pub fn parse_coefficient_set(cell: &str) -> ModelResult<CoefficientSet> {
    let tokens: Vec<&str> = cell.split(';').map(str::trim).collect();
    if tokens.len() != TOKENS {
        return Err(ModelError::MalformedCoefficients {
            value: cell.to_string(),
            reason: format!("expected {} tokens, found {}", TOKENS, tokens.len()),
        });
    }

    let mut values = [0.0; TOKENS];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token
            .parse::<f64>()
            .map_err(|e| ModelError::MalformedCoefficients {
                value: cell.to_string(),
                reason: format!("'{}': {}", token, e),
            })?;
        if !slot.is_finite() {
            return Err(ModelError::MalformedCoefficients {
                value: cell.to_string(),
                reason: format!("'{}' is not a finite number", token),
            });
        }
    }

    let [ar, br, ap, bp] = values;
    Ok(CoefficientSet::new(ar, br, ap, bp))
}

/// Parse the coefficient table into per-class, per-band sets
pub fn parse_coefficient_table(rows: &[RawCoefficientRow]) -> ModelResult<EmissionCoefficients> {
    let mut classes = HashMap::new();
    for row in rows {
        let class: VehicleClass = row.vehicle_type.parse()?;
        let cells = row.cells();
        let sets = BandLevels::try_from_fn(|band| parse_coefficient_set(cells[band]))?;
        if classes.insert(class, sets).is_some() {
            warn!(vehicle_class = %class, "Duplicate coefficient row, keeping the last one");
        }
    }
    Ok(EmissionCoefficients::new(classes))
}
