//! Energetic aggregation per receiver
//!
//! Per band: clip to 0 dB, convert to power, sum over every row reaching
//! the receiver, convert back to dB. The total is the energetic sum of the
//! band sums.

use crate::acoustics::{db_to_power, power_to_db};
use crate::models::{AttenuatedRow, BandLevels, ReceiverLevel};
use std::collections::BTreeMap;
use tracing::warn;

struct Accumulator {
    x: f64,
    y: f64,
    power: BandLevels<Option<f64>>,
}

/// Aggregate attenuated rows into one level row per receiver, ordered by id
pub fn aggregate_receivers(rows: &[AttenuatedRow]) -> Vec<ReceiverLevel> {
    let mut receivers: BTreeMap<&str, Accumulator> = BTreeMap::new();
    let mut unplaced = 0usize;
    let mut missing_values = 0usize;

    for row in rows {
        let Some(point) = &row.receiver else {
            unplaced += 1;
            continue;
        };

        // Coordinates are taken from the first row of each receiver
        let acc = receivers.entry(point.id.as_str()).or_insert_with(|| Accumulator {
            x: point.x,
            y: point.y,
            power: BandLevels::default(),
        });

        for (band, level) in row.levels.iter() {
            match level {
                Some(db) => {
                    let power = db_to_power(db.max(0.0));
                    let sum = acc.power[band].get_or_insert(0.0);
                    *sum += power;
                }
                None => missing_values += 1,
            }
        }
    }

    if unplaced > 0 {
        warn!(rows = unplaced, "Rows without a receiver excluded from aggregation");
    }
    if missing_values > 0 {
        warn!(values = missing_values, "Missing band levels excluded from aggregation");
    }

    receivers
        .into_iter()
        .map(|(id, acc)| {
            let band_powers: Vec<f64> = acc.power.values().iter().flatten().copied().collect();
            let total_db = if band_powers.is_empty() {
                None
            } else {
                Some(power_to_db(band_powers.iter().sum()))
            };
            ReceiverLevel {
                receiver: id.to_string(),
                x: acc.x,
                y: acc.y,
                levels: acc.power.map(|_, power| power.map(power_to_db)),
                total_db,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrequencyBand, ReceiverPoint, VehicleClass};

    fn row(receiver: Option<&str>, x: f64, level: Option<f64>) -> AttenuatedRow {
        AttenuatedRow {
            receiver: receiver.map(|id| ReceiverPoint {
                id: id.to_string(),
                x,
                y: 0.0,
            }),
            segment_id: "s".to_string(),
            vehicle_class: VehicleClass::Light,
            levels: BandLevels::from_fn(|_| level),
        }
    }

    #[test]
    fn test_two_equal_rows_add_three_db() {
        let out = aggregate_receivers(&[
            row(Some("R1"), 0.0, Some(10.0)),
            row(Some("R1"), 0.0, Some(10.0)),
        ]);
        assert_eq!(out.len(), 1);
        let level = out[0].levels[FrequencyBand::Hz500].unwrap();
        assert!((level - 13.01).abs() < 1e-2);
    }

    #[test]
    fn test_singleton_reproduces_clipped_levels() {
        let mut single = row(Some("R1"), 0.0, Some(42.0));
        single.levels[FrequencyBand::Hz63] = Some(-7.0);
        let out = aggregate_receivers(&[single]);
        assert!((out[0].levels[FrequencyBand::Hz250].unwrap() - 42.0).abs() < 1e-9);
        assert!(out[0].levels[FrequencyBand::Hz63].unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_total_is_energetic_sum_of_bands() {
        let out = aggregate_receivers(&[row(Some("R1"), 0.0, Some(30.0))]);
        // 8 bands at 30 dB -> 30 + 10*log10(8)
        let expected = 30.0 + 10.0 * 8f64.log10();
        assert!((out[0].total_db.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_one_row_per_receiver_with_first_coordinates() {
        let out = aggregate_receivers(&[
            row(Some("R2"), 1.0, Some(10.0)),
            row(Some("R1"), 2.0, Some(10.0)),
            row(Some("R2"), 3.0, Some(10.0)),
        ]);
        let ids: Vec<&str> = out.iter().map(|r| r.receiver.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2"]);
        assert_eq!(out[1].x, 1.0);
    }

    #[test]
    fn test_rows_without_receiver_excluded() {
        let out =
            aggregate_receivers(&[row(None, 0.0, Some(80.0)), row(Some("R1"), 0.0, Some(10.0))]);
        assert_eq!(out.len(), 1);
        assert!((out[0].levels[FrequencyBand::Hz63].unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_levels_excluded() {
        let out =
            aggregate_receivers(&[row(Some("R1"), 0.0, None), row(Some("R1"), 0.0, Some(20.0))]);
        assert!((out[0].levels[FrequencyBand::Hz63].unwrap() - 20.0).abs() < 1e-9);

        let empty = aggregate_receivers(&[row(Some("R9"), 0.0, None)]);
        assert!(empty[0].levels.iter().all(|(_, l)| l.is_none()));
        assert_eq!(empty[0].total_db, None);
    }
}
