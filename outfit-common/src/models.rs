//! Traffic observation model shared by the collector and the noise model

use crate::table::{Schema, ToRow};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time-of-day bucket selecting time-varying street parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Daytime {
    /// 06:00 - 19:59
    Day,
    /// 20:00 - 21:59
    Evening,
    /// 22:00 - 05:59
    Night,
}

impl Daytime {
    /// Bucket for a clock hour (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=19 => Daytime::Day,
            20..=21 => Daytime::Evening,
            _ => Daytime::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Daytime::Day => "day",
            Daytime::Evening => "evening",
            Daytime::Night => "night",
        }
    }
}

impl fmt::Display for Daytime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Daytime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "day" => Ok(Daytime::Day),
            "evening" => Ok(Daytime::Evening),
            "night" => Ok(Daytime::Night),
            other => Err(Error::InvalidInput(format!("Unknown daytime '{}'", other))),
        }
    }
}

/// One traversal of a road segment as reported by the routing service
///
/// `travel_time` is never 0 (the collector floors it to 1 s). Segments the
/// service could not resolve carry the sentinel distance = travel_time =
/// speed = 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficObservation {
    /// Segment identifier, also the source key of the attenuation matrix
    pub id: String,
    pub name: String,
    /// Origin as "lat,lon"
    pub xy_start: String,
    /// Destination as "lat,lon"
    pub xy_end: String,
    /// Road class (joins with street parameters)
    pub highway: String,
    pub daytime: Daytime,
    /// Route length in metres
    pub distance: f64,
    /// Travel time in seconds
    pub travel_time: f64,
    /// Average speed in km/h
    pub speed: f64,
    /// Collection time (RFC 3339), not used by the model
    #[serde(default)]
    pub datetime: Option<String>,
}

impl Schema for TrafficObservation {
    const NAME: &'static str = "traffic observations";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "xy_start",
        "xy_end",
        "highway",
        "daytime",
        "distance",
        "travel_time",
        "speed",
    ];
}

impl ToRow for TrafficObservation {
    fn headers() -> Vec<String> {
        let mut headers: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_string()).collect();
        headers.push("datetime".to_string());
        headers
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.xy_start.clone(),
            self.xy_end.clone(),
            self.highway.clone(),
            self.daytime.to_string(),
            self.distance.to_string(),
            self.travel_time.to_string(),
            self.speed.to_string(),
            self.datetime.clone().unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daytime_buckets() {
        assert_eq!(Daytime::from_hour(0), Daytime::Night);
        assert_eq!(Daytime::from_hour(5), Daytime::Night);
        assert_eq!(Daytime::from_hour(6), Daytime::Day);
        assert_eq!(Daytime::from_hour(19), Daytime::Day);
        assert_eq!(Daytime::from_hour(20), Daytime::Evening);
        assert_eq!(Daytime::from_hour(21), Daytime::Evening);
        assert_eq!(Daytime::from_hour(22), Daytime::Night);
        assert_eq!(Daytime::from_hour(23), Daytime::Night);
    }

    #[test]
    fn test_daytime_parse() {
        assert_eq!("evening".parse::<Daytime>().unwrap(), Daytime::Evening);
        assert!("noon".parse::<Daytime>().is_err());
    }
}
