//! Propagation attenuation
//!
//! Each sound power row fans out to every receiver the matrix lists for its
//! (segment, vehicle class). Corrections are added in dB. Sources the
//! matrix does not know keep their levels and get no receiver.

use crate::models::{AttenuatedRow, AttenuationMatrix, BandLevels, SoundPowerRow};
use tracing::warn;

/// Add per-band corrections to source levels; missing levels stay missing
pub fn attenuate(
    levels: &BandLevels<Option<f64>>,
    corrections: &BandLevels<f64>,
) -> BandLevels<Option<f64>> {
    levels.map(|band, level| level.map(|db| db + corrections[band]))
}

pub fn apply_attenuation(rows: &[SoundPowerRow], matrix: &AttenuationMatrix) -> Vec<AttenuatedRow> {
    let mut attenuated = Vec::with_capacity(rows.len());
    let mut unmatched = 0usize;

    for row in rows {
        let entries = matrix.lookup(&row.segment_id, row.vehicle_class);
        if entries.is_empty() {
            unmatched += 1;
            attenuated.push(AttenuatedRow {
                receiver: None,
                segment_id: row.segment_id.clone(),
                vehicle_class: row.vehicle_class,
                levels: row.levels,
            });
            continue;
        }

        attenuated.extend(entries.iter().map(|entry| AttenuatedRow {
            receiver: Some(entry.receiver.clone()),
            segment_id: row.segment_id.clone(),
            vehicle_class: row.vehicle_class,
            levels: attenuate(&row.levels, &entry.corrections),
        }));
    }

    if unmatched > 0 {
        warn!(
            rows = unmatched,
            "Sound power rows without attenuation entries (no correction applied)"
        );
    }

    attenuated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrequencyBand, RawAttenuationRow, VehicleClass};

    fn source(id: &str, level: Option<f64>) -> SoundPowerRow {
        SoundPowerRow {
            segment_id: id.to_string(),
            vehicle_class: VehicleClass::Light,
            levels: BandLevels::from_fn(|_| level),
        }
    }

    fn matrix_row(receiver: &str, id: &str, correction: f64) -> RawAttenuationRow {
        RawAttenuationRow {
            receiver: receiver.to_string(),
            id: id.to_string(),
            vehicle_type: VehicleClass::Light,
            x: 5.0,
            y: 6.0,
            hz63: Some(correction),
            hz125: Some(correction),
            hz250: Some(correction),
            hz500: Some(correction),
            hz1000: Some(correction),
            hz2000: Some(correction),
            hz4000: Some(correction),
            hz8000: None,
        }
    }

    #[test]
    fn test_corrections_added_in_db() {
        let matrix = AttenuationMatrix::new(vec![matrix_row("R1", "s1", -20.0)]);
        let rows = apply_attenuation(&[source("s1", Some(70.0))], &matrix);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].levels[FrequencyBand::Hz63], Some(50.0));
        // Empty matrix cell
        assert_eq!(rows[0].levels[FrequencyBand::Hz8000], Some(70.0));
        assert_eq!(rows[0].receiver.as_ref().unwrap().id, "R1");
    }

    #[test]
    fn test_fan_out_to_receivers() {
        let matrix = AttenuationMatrix::new(vec![
            matrix_row("R1", "s1", -20.0),
            matrix_row("R2", "s1", -10.0),
            matrix_row("R3", "s2", -10.0),
        ]);
        let rows = apply_attenuation(&[source("s1", Some(70.0))], &matrix);
        let receivers: Vec<&str> = rows
            .iter()
            .map(|r| r.receiver.as_ref().unwrap().id.as_str())
            .collect();
        assert_eq!(receivers, vec!["R1", "R2"]);
    }

    #[test]
    fn test_missing_entry_leaves_levels_unchanged() {
        let matrix = AttenuationMatrix::new(vec![matrix_row("R1", "s1", -20.0)]);
        let input = source("unknown", Some(61.5));
        let rows = apply_attenuation(&[input.clone()], &matrix);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].levels, input.levels);
        assert!(rows[0].receiver.is_none());
    }

    #[test]
    fn test_missing_levels_stay_missing() {
        let matrix = AttenuationMatrix::new(vec![matrix_row("R1", "s1", -20.0)]);
        let rows = apply_attenuation(&[source("s1", None)], &matrix);
        assert!(rows[0].levels.iter().all(|(_, l)| l.is_none()));
    }
}
