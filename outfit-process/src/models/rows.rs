//! Rows flowing between batch stages

use super::{BandLevels, FrequencyBand, ReceiverPoint, VehicleClass};
use outfit_common::ToRow;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn band_headers() -> impl Iterator<Item = String> {
    FrequencyBand::LABELS.iter().map(|l| l.to_string())
}

fn band_cells(levels: &BandLevels<Option<f64>>) -> impl Iterator<Item = String> + '_ {
    levels.values().iter().map(|v| cell(*v))
}

/// Estimated vehicle count for one (segment, vehicle class)
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEstimate {
    pub segment_id: String,
    pub name: String,
    /// Observed speed in km/h
    pub speed: f64,
    pub vehicle_class: VehicleClass,
    /// `None` when the observation had no street parameters or the
    /// estimate was not a finite number
    pub vehicle_count: Option<u64>,
}

impl ToRow for FlowEstimate {
    fn headers() -> Vec<String> {
        ["id", "name", "speed", "vehicle_type", "vehicle_count"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.segment_id.clone(),
            self.name.clone(),
            self.speed.to_string(),
            self.vehicle_class.to_string(),
            self.vehicle_count.map(|c| c.to_string()).unwrap_or_default(),
        ]
    }
}

/// A-weighted sound power level per band for one (segment, vehicle class)
#[derive(Debug, Clone, PartialEq)]
pub struct SoundPowerRow {
    pub segment_id: String,
    pub vehicle_class: VehicleClass,
    pub levels: BandLevels<Option<f64>>,
}

impl ToRow for SoundPowerRow {
    fn headers() -> Vec<String> {
        let mut headers = vec!["id".to_string(), "vehicle_type".to_string()];
        headers.extend(band_headers());
        headers
    }

    fn to_row(&self) -> Vec<String> {
        let mut row = vec![self.segment_id.clone(), self.vehicle_class.to_string()];
        row.extend(band_cells(&self.levels));
        row
    }
}

/// Sound power attenuated towards one receiver
///
/// Rows whose source is missing from the attenuation matrix keep their
/// levels unchanged and have no receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct AttenuatedRow {
    pub receiver: Option<ReceiverPoint>,
    pub segment_id: String,
    pub vehicle_class: VehicleClass,
    pub levels: BandLevels<Option<f64>>,
}

impl ToRow for AttenuatedRow {
    fn headers() -> Vec<String> {
        let mut headers: Vec<String> = ["receiver", "X", "Y", "id", "vehicle_type"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        headers.extend(band_headers());
        headers
    }

    fn to_row(&self) -> Vec<String> {
        let mut row = match &self.receiver {
            Some(point) => vec![point.id.clone(), point.x.to_string(), point.y.to_string()],
            None => vec![String::new(), String::new(), String::new()],
        };
        row.push(self.segment_id.clone());
        row.push(self.vehicle_class.to_string());
        row.extend(band_cells(&self.levels));
        row
    }
}

/// Final sound pressure levels at one receiver
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverLevel {
    pub receiver: String,
    pub x: f64,
    pub y: f64,
    /// dB per band; `None` when no row contributed to the band
    pub levels: BandLevels<Option<f64>>,
    /// Broadband level over every contributing band
    pub total_db: Option<f64>,
}

impl ToRow for ReceiverLevel {
    fn headers() -> Vec<String> {
        let mut headers = vec!["receiver".to_string(), "X".to_string(), "Y".to_string()];
        headers.extend(band_headers());
        headers.push("total_db".to_string());
        headers
    }

    fn to_row(&self) -> Vec<String> {
        let mut row = vec![self.receiver.clone(), self.x.to_string(), self.y.to_string()];
        row.extend(band_cells(&self.levels));
        row.push(cell(self.total_db));
        row
    }
}
