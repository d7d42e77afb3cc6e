//! Sound power per (segment, vehicle class) and frequency band

use crate::acoustics::{flow_sound_power, NO_CONTRIBUTION_DB};
use crate::error::{ModelError, ModelResult};
use crate::models::{
    AWeightingCurve, BandLevels, EmissionCoefficients, FlowEstimate, SoundPowerRow,
};
use tracing::warn;

/// A-weighted sound power levels for one flow estimate
///
/// A missing count gives missing levels. An empty flow contributes
/// exactly 0 dB before weighting and is not checked against the speed
/// domain.
pub fn flow_levels(
    flow: &FlowEstimate,
    coefficients: &EmissionCoefficients,
    a_weighting: &AWeightingCurve,
) -> ModelResult<BandLevels<Option<f64>>> {
    let Some(count) = flow.vehicle_count else {
        return Ok(BandLevels::default());
    };

    if count == 0 {
        return Ok(BandLevels::from_fn(|band| {
            Some(NO_CONTRIBUTION_DB + a_weighting.correction(band))
        }));
    }

    if !(flow.speed.is_finite() && flow.speed > 0.0) {
        return Err(ModelError::NonPositiveSpeed {
            segment: flow.segment_id.clone(),
            speed: flow.speed,
        });
    }

    let sets = coefficients
        .get(flow.vehicle_class)
        .ok_or(ModelError::MissingCoefficients(flow.vehicle_class))?;

    BandLevels::try_from_fn(|band| {
        let level = flow_sound_power(&sets[band], flow.speed, count) + a_weighting.correction(band);
        if !level.is_finite() {
            return Err(ModelError::NonFiniteSoundPower {
                segment: flow.segment_id.clone(),
                vehicle_class: flow.vehicle_class,
                band,
                level,
            });
        }
        Ok(Some(level))
    })
}

/// Compute sound power rows for every flow estimate
pub fn compute_sound_power(
    flows: &[FlowEstimate],
    coefficients: &EmissionCoefficients,
    a_weighting: &AWeightingCurve,
) -> ModelResult<Vec<SoundPowerRow>> {
    let rows = flows
        .iter()
        .map(|flow| {
            Ok(SoundPowerRow {
                segment_id: flow.segment_id.clone(),
                vehicle_class: flow.vehicle_class,
                levels: flow_levels(flow, coefficients, a_weighting)?,
            })
        })
        .collect::<ModelResult<Vec<_>>>()?;

    let missing = flows.iter().filter(|f| f.vehicle_count.is_none()).count();
    if missing > 0 {
        warn!(rows = missing, "Sound power left empty for flows without a vehicle count");
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoefficientSet, FrequencyBand, VehicleClass};
    use std::collections::HashMap;

    fn flow(count: Option<u64>, speed: f64) -> FlowEstimate {
        FlowEstimate {
            segment_id: "s1".to_string(),
            name: "Lungarno".to_string(),
            speed,
            vehicle_class: VehicleClass::Light,
            vehicle_count: count,
        }
    }

    fn zero_coefficients() -> EmissionCoefficients {
        let mut classes = HashMap::new();
        classes.insert(VehicleClass::Light, BandLevels::from_fn(|_| CoefficientSet::default()));
        EmissionCoefficients::new(classes)
    }

    fn flat_weighting() -> AWeightingCurve {
        AWeightingCurve(BandLevels::from_fn(|_| 0.0))
    }

    #[test]
    fn test_reference_flow_level() {
        let levels =
            flow_levels(&flow(Some(1000), 50.0), &zero_coefficients(), &flat_weighting())
                .unwrap();
        for (_, level) in levels.iter() {
            assert!((level.unwrap() - (-13.98)).abs() < 1e-2);
        }
    }

    #[test]
    fn test_a_weighting_added_per_band() {
        let curve = AWeightingCurve(BandLevels::from_fn(|band| -(band.hz() as f64) / 1000.0));
        let levels = flow_levels(&flow(Some(0), 50.0), &zero_coefficients(), &curve).unwrap();
        assert_eq!(levels[FrequencyBand::Hz8000], Some(-8.0));
        assert_eq!(levels[FrequencyBand::Hz1000], Some(-1.0));
    }

    #[test]
    fn test_empty_flow_is_zero_for_any_speed() {
        for speed in [0.0, -10.0, 50.0] {
            let levels = flow_levels(
                &flow(Some(0), speed),
                &EmissionCoefficients::default(),
                &flat_weighting(),
            )
            .unwrap();
            assert!(levels.iter().all(|(_, l)| *l == Some(0.0)));
        }
    }

    #[test]
    fn test_missing_count_gives_missing_levels() {
        let levels =
            flow_levels(&flow(None, 50.0), &zero_coefficients(), &flat_weighting()).unwrap();
        assert!(levels.iter().all(|(_, l)| l.is_none()));
    }

    #[test]
    fn test_non_positive_speed_fails() {
        let err =
            compute_sound_power(&[flow(Some(10), 0.0)], &zero_coefficients(), &flat_weighting())
                .unwrap_err();
        assert!(matches!(err, ModelError::NonPositiveSpeed { ref segment, .. } if segment == "s1"));
    }

    #[test]
    fn test_missing_coefficients_fail_only_with_traffic() {
        let none = EmissionCoefficients::default();
        assert!(flow_levels(&flow(Some(0), 50.0), &none, &flat_weighting()).is_ok());
        assert!(matches!(
            flow_levels(&flow(Some(5), 50.0), &none, &flat_weighting()),
            Err(ModelError::MissingCoefficients(VehicleClass::Light))
        ));
    }

    #[test]
    fn test_non_finite_level_fails_with_segment() {
        let mut classes = HashMap::new();
        classes.insert(
            VehicleClass::Light,
            BandLevels::from_fn(|_| CoefficientSet::new(f64::INFINITY, 0.0, 0.0, 0.0)),
        );
        let coefficients = EmissionCoefficients::new(classes);

        let err = compute_sound_power(&[flow(Some(100), 50.0)], &coefficients, &flat_weighting())
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonFiniteSoundPower { ref segment, band: FrequencyBand::Hz63, .. }
                if segment == "s1"
        ));
    }

    #[test]
    fn test_non_finite_weighting_fails() {
        let mut curve = flat_weighting();
        curve.0[FrequencyBand::Hz500] = f64::NAN;
        let err =
            flow_levels(&flow(Some(100), 50.0), &zero_coefficients(), &curve).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonFiniteSoundPower { band: FrequencyBand::Hz500, .. }
        ));
    }
}
