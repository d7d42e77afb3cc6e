//! Street parameter normalization
//!
//! Turns one row per (highway, daytime) with raw class weights into one row
//! per vehicle class holding the normalized share of the flow:
//!
//! ```text
//! share_k = (w_k * m_k) / sum_j (w_j * m_j)
//! ```
//!
//! where `m_k` is the class multiplier. Free-flow speed is converted from
//! km/h to m/s.

use crate::error::{ModelError, ModelResult};
use crate::models::{RawStreetParams, StreetParameter, VehicleClass};

pub const KMH_PER_MS: f64 = 3.6;

/// Normalize and reshape the street parameter table (wide to long)
pub fn normalize_street_params(rows: &[RawStreetParams]) -> ModelResult<Vec<StreetParameter>> {
    let mut normalized = Vec::with_capacity(rows.len() * VehicleClass::ALL.len());

    for row in rows {
        let denominator: f64 = VehicleClass::ALL
            .iter()
            .map(|&class| row.raw_weight(class) * class.multiplier())
            .sum();

        if denominator == 0.0 || !denominator.is_finite() {
            return Err(ModelError::DegenerateWeights {
                highway: row.highway.clone(),
                daytime: row.daytime,
                denominator,
            });
        }

        for class in VehicleClass::ALL {
            normalized.push(StreetParameter {
                highway: row.highway.clone(),
                capacity: row.capacity,
                free_speed: row.free_speed / KMH_PER_MS,
                daytime: row.daytime,
                alpha: row.alpha,
                beta: row.beta,
                vehicle_class: class,
                share: row.raw_weight(class) * class.multiplier() / denominator,
            });
        }
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use outfit_common::Daytime;

    fn raw(highway: &str, weights: [f64; 4]) -> RawStreetParams {
        RawStreetParams {
            highway: highway.to_string(),
            capacity: 1800.0,
            free_speed: 54.0,
            daytime: Daytime::Day,
            alpha: 0.15,
            beta: 4.0,
            f1: weights[0],
            f2: weights[1],
            f3: weights[2],
            f4: weights[3],
        }
    }

    #[test]
    fn test_shares_sum_to_one() {
        let rows = vec![
            raw("primary", [0.8, 0.1, 0.05, 0.05]),
            raw("residential", [3.0, 0.0, 7.0, 1.0]),
        ];
        let normalized = normalize_street_params(&rows).unwrap();
        assert_eq!(normalized.len(), 8);

        for chunk in normalized.chunks(4) {
            let sum: f64 = chunk.iter().map(|p| p.share).sum();
            assert!((sum - 1.0).abs() < 1e-12, "sum = {}", sum);
            assert!(chunk.iter().all(|p| (0.0..=1.0).contains(&p.share)));
        }
    }

    #[test]
    fn test_weighted_shares() {
        // 1*1 + 1*2 + 1*0 + 2*0.5 = 4
        let normalized = normalize_street_params(&[raw("primary", [1.0, 1.0, 1.0, 2.0])]).unwrap();
        let shares: Vec<f64> = normalized.iter().map(|p| p.share).collect();
        assert_eq!(shares, vec![0.25, 0.5, 0.0, 0.25]);
        assert_eq!(normalized[1].vehicle_class, VehicleClass::MediumHeavy);
    }

    #[test]
    fn test_free_speed_in_metres_per_second() {
        let normalized = normalize_street_params(&[raw("primary", [1.0, 0.0, 0.0, 0.0])]).unwrap();
        assert!((normalized[0].free_speed - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_denominator_is_degenerate() {
        // Heavy vehicles carry no weight, so a heavy-only row is degenerate
        let err = normalize_street_params(&[raw("track", [0.0, 0.0, 5.0, 0.0])]).unwrap_err();
        match err {
            ModelError::DegenerateWeights { highway, daytime, .. } => {
                assert_eq!(highway, "track");
                assert_eq!(daytime, Daytime::Day);
            }
            other => panic!("expected DegenerateWeights, got {:?}", other),
        }
    }
}
