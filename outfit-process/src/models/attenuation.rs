//! Propagation attenuation matrix

use super::{BandLevels, VehicleClass};
use outfit_common::stage::RowCount;
use outfit_common::Schema;
use serde::Deserialize;
use std::collections::HashMap;

/// Attenuation row after its headers were renamed to canonical names
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAttenuationRow {
    pub receiver: String,
    /// Source segment id (joins with the observation id)
    pub id: String,
    pub vehicle_type: VehicleClass,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "63")]
    pub hz63: Option<f64>,
    #[serde(rename = "125")]
    pub hz125: Option<f64>,
    #[serde(rename = "250")]
    pub hz250: Option<f64>,
    #[serde(rename = "500")]
    pub hz500: Option<f64>,
    #[serde(rename = "1000")]
    pub hz1000: Option<f64>,
    #[serde(rename = "2000")]
    pub hz2000: Option<f64>,
    #[serde(rename = "4000")]
    pub hz4000: Option<f64>,
    #[serde(rename = "8000")]
    pub hz8000: Option<f64>,
}

impl Schema for RawAttenuationRow {
    const NAME: &'static str = "attenuation matrix";
    const COLUMNS: &'static [&'static str] = &[
        "receiver",
        "id",
        "vehicle_type",
        "X",
        "Y",
        "63",
        "125",
        "250",
        "500",
        "1000",
        "2000",
        "4000",
        "8000",
    ];
}

impl RawAttenuationRow {
    /// Per-band corrections; empty cells mean no attenuation
    pub fn corrections(&self) -> BandLevels<f64> {
        BandLevels::new([
            self.hz63.unwrap_or(0.0),
            self.hz125.unwrap_or(0.0),
            self.hz250.unwrap_or(0.0),
            self.hz500.unwrap_or(0.0),
            self.hz1000.unwrap_or(0.0),
            self.hz2000.unwrap_or(0.0),
            self.hz4000.unwrap_or(0.0),
            self.hz8000.unwrap_or(0.0),
        ])
    }
}

/// Fixed receiver location
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Attenuation from one source to one receiver
#[derive(Debug, Clone, PartialEq)]
pub struct AttenuationEntry {
    pub receiver: ReceiverPoint,
    /// dB correction per band
    pub corrections: BandLevels<f64>,
}

impl From<RawAttenuationRow> for AttenuationEntry {
    fn from(row: RawAttenuationRow) -> Self {
        let corrections = row.corrections();
        AttenuationEntry {
            receiver: ReceiverPoint {
                id: row.receiver,
                x: row.x,
                y: row.y,
            },
            corrections,
        }
    }
}

/// Attenuation entries indexed by (segment id, vehicle class)
#[derive(Debug, Clone, Default)]
pub struct AttenuationMatrix {
    entries: HashMap<(String, VehicleClass), Vec<AttenuationEntry>>,
    rows: usize,
}

impl AttenuationMatrix {
    pub fn new(rows: Vec<RawAttenuationRow>) -> Self {
        let count = rows.len();
        let mut entries: HashMap<(String, VehicleClass), Vec<AttenuationEntry>> = HashMap::new();
        for row in rows {
            entries
                .entry((row.id.clone(), row.vehicle_type))
                .or_default()
                .push(AttenuationEntry::from(row));
        }
        Self {
            entries,
            rows: count,
        }
    }

    /// Receivers reached by a source, in matrix order (empty if unknown)
    pub fn lookup(&self, segment_id: &str, class: VehicleClass) -> &[AttenuationEntry] {
        self.entries
            .get(&(segment_id.to_string(), class))
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

impl RowCount for AttenuationMatrix {
    fn row_count(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FrequencyBand;

    fn row(receiver: &str, id: &str, class: VehicleClass) -> RawAttenuationRow {
        RawAttenuationRow {
            receiver: receiver.to_string(),
            id: id.to_string(),
            vehicle_type: class,
            x: 1.0,
            y: 2.0,
            hz63: Some(-10.0),
            hz125: None,
            hz250: Some(-5.0),
            hz500: None,
            hz1000: None,
            hz2000: None,
            hz4000: None,
            hz8000: Some(-30.0),
        }
    }

    #[test]
    fn test_empty_cells_mean_zero() {
        let entry = AttenuationEntry::from(row("R1", "S1", VehicleClass::Light));
        assert_eq!(entry.corrections[FrequencyBand::Hz63], -10.0);
        assert_eq!(entry.corrections[FrequencyBand::Hz125], 0.0);
        assert_eq!(entry.corrections[FrequencyBand::Hz8000], -30.0);
    }

    #[test]
    fn test_lookup_by_segment_and_class() {
        let matrix = AttenuationMatrix::new(vec![
            row("R1", "S1", VehicleClass::Light),
            row("R2", "S1", VehicleClass::Light),
            row("R1", "S1", VehicleClass::PoweredTwoWheeler),
        ]);
        assert_eq!(matrix.len(), 3);
        let receivers: Vec<&str> = matrix
            .lookup("S1", VehicleClass::Light)
            .iter()
            .map(|e| e.receiver.id.as_str())
            .collect();
        assert_eq!(receivers, vec!["R1", "R2"]);
        assert!(matrix.lookup("S1", VehicleClass::MediumHeavy).is_empty());
        assert!(matrix.lookup("S9", VehicleClass::Light).is_empty());
    }
}
