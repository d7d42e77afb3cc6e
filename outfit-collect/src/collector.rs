//! Travel-time collection
//!
//! Every road segment becomes one traffic observation stamped with the
//! collection time and its daytime bucket. Segments that cannot be routed
//! are kept with the sentinel metrics (distance = travel_time = speed = 1).

use crate::directions::{DirectionsError, RouteMetrics};
use chrono::{DateTime, Local, Timelike};
use outfit_common::config::DirectionsConfig;
use outfit_common::{Daytime, Error, Result, Schema, TrafficObservation};
use serde::Deserialize;
use std::future::Future;
use tracing::{info, warn};

/// Environment variable holding the directions API key
pub const API_KEY_ENV_VAR: &str = "OUTFIT_DIRECTIONS_API_KEY";

/// Road segment to observe
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentRow {
    pub id: String,
    pub name: String,
    /// Origin as "lat,lon"
    pub xy_start: String,
    /// Destination as "lat,lon"
    pub xy_end: String,
    pub highway: String,
}

impl Schema for SegmentRow {
    const NAME: &'static str = "road segments";
    const COLUMNS: &'static [&'static str] = &["id", "name", "xy_start", "xy_end", "highway"];
}

impl SegmentRow {
    fn has_coordinates(&self) -> bool {
        !self.xy_start.trim().is_empty() && !self.xy_end.trim().is_empty()
    }

    /// Observation carrying the sentinel metrics
    pub fn sentinel_observation(&self, at: &DateTime<Local>) -> TrafficObservation {
        self.observation(at, RouteMetrics::SENTINEL)
    }

    pub fn observation(&self, at: &DateTime<Local>, metrics: RouteMetrics) -> TrafficObservation {
        TrafficObservation {
            id: self.id.clone(),
            name: self.name.clone(),
            xy_start: self.xy_start.clone(),
            xy_end: self.xy_end.clone(),
            highway: self.highway.clone(),
            daytime: Daytime::from_hour(at.hour()),
            distance: metrics.distance,
            travel_time: metrics.travel_time,
            speed: metrics.speed,
            datetime: Some(at.to_rfc3339()),
        }
    }
}

/// Resolve the API key: environment variable first, then the configuration
pub fn resolve_api_key(config: &DirectionsConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV_VAR).ok();
    resolve_api_key_from(env_key.as_deref(), config)
}

/// Key resolution with an explicit environment value
pub fn resolve_api_key_from(env_key: Option<&str>, config: &DirectionsConfig) -> Result<String> {
    if let Some(key) = env_key.filter(|k| is_valid_key(k)) {
        info!("Directions API key loaded from environment variable");
        return Ok(key.to_string());
    }

    if let Some(key) = config.api_key.as_deref().filter(|k| is_valid_key(k)) {
        info!("Directions API key loaded from TOML config");
        return Ok(key.to_string());
    }

    Err(Error::Config(format!(
        "Directions API key not configured. Set {} or directions.api_key in the TOML config",
        API_KEY_ENV_VAR
    )))
}

/// Non-empty, non-whitespace
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Route every segment in order, one request at a time
///
/// `lookup` receives the origin and destination of each segment that has
/// both coordinates. Failures are logged and leave the sentinel in place.
pub async fn collect_observations<F, Fut>(
    segments: &[SegmentRow],
    at: &DateTime<Local>,
    mut lookup: F,
) -> Vec<TrafficObservation>
where
    F: FnMut(String, String) -> Fut,
    Fut: Future<Output = std::result::Result<RouteMetrics, DirectionsError>>,
{
    let mut observations = Vec::with_capacity(segments.len());
    let mut failed = 0usize;

    for segment in segments {
        if !segment.has_coordinates() {
            warn!(
                id = %segment.id,
                name = %segment.name,
                "Skipping segment with missing coordinates"
            );
            failed += 1;
            observations.push(segment.sentinel_observation(at));
            continue;
        }

        match lookup(segment.xy_start.clone(), segment.xy_end.clone()).await {
            Ok(metrics) => observations.push(segment.observation(at, metrics)),
            Err(e) => {
                warn!(
                    "Failed to retrieve directions: {} -> {} | {}",
                    segment.xy_start, segment.xy_end, e
                );
                failed += 1;
                observations.push(segment.sentinel_observation(at));
            }
        }
    }

    info!(
        segments = segments.len(),
        unresolved = failed,
        "Travel times collected"
    );
    observations
}
