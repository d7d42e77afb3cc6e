//! Directions service client
//!
//! Queries a Google-Directions-compatible endpoint for the current travel
//! time between two "lat,lon" points (`departure_time=now`, so the service
//! reports `duration_in_traffic`).

use outfit_common::config::DirectionsConfig;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("outfit-collect/", env!("CARGO_PKG_VERSION"));

/// Directions client errors
#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("No route found (status {0})")]
    NoRoute(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Directions response (only the fields the collector reads)
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    pub distance: Measure,
    pub duration: Measure,
    /// Only present when a departure time was requested
    pub duration_in_traffic: Option<Measure>,
}

/// A measured quantity: metres for distances, seconds for durations
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Measure {
    pub value: f64,
}

/// Distance, travel time and speed of one route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMetrics {
    /// Metres
    pub distance: f64,
    /// Seconds, never 0
    pub travel_time: f64,
    /// km/h, rounded to an integer
    pub speed: f64,
}

impl RouteMetrics {
    /// Marks a segment the service could not resolve
    pub const SENTINEL: RouteMetrics = RouteMetrics {
        distance: 1.0,
        travel_time: 1.0,
        speed: 1.0,
    };

    /// Metrics from a distance (m) and a duration (s); a 0 s duration counts as 1 s
    pub fn from_leg(distance: f64, duration: f64) -> Self {
        let travel_time = if duration == 0.0 { 1.0 } else { duration };
        Self {
            distance,
            travel_time,
            speed: (distance / travel_time * 3.6).round(),
        }
    }
}

impl DirectionsResponse {
    /// Metrics of the first leg of the first route
    pub fn first_leg_metrics(&self) -> Result<RouteMetrics, DirectionsError> {
        let leg = self
            .routes
            .first()
            .and_then(|route| route.legs.first())
            .ok_or_else(|| DirectionsError::NoRoute(self.status.clone()))?;

        let duration = leg.duration_in_traffic.ok_or_else(|| {
            DirectionsError::ParseError("leg has no duration_in_traffic".to_string())
        })?;

        Ok(RouteMetrics::from_leg(leg.distance.value, duration.value))
    }
}

/// Directions API client
pub struct DirectionsClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(config: &DirectionsConfig, api_key: String) -> Result<Self, DirectionsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DirectionsError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Current route metrics between two "lat,lon" points
    pub async fn route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<RouteMetrics, DirectionsError> {
        tracing::debug!(origin = %origin, destination = %destination, "Querying directions");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("key", self.api_key.as_str()),
                ("departure_time", "now"),
            ])
            .send()
            .await
            .map_err(|e| DirectionsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DirectionsError::ApiError(status.as_u16(), error_text));
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| DirectionsError::ParseError(e.to_string()))?;

        body.first_leg_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<RouteMetrics, DirectionsError> {
        serde_json::from_str::<DirectionsResponse>(json)
            .unwrap()
            .first_leg_metrics()
    }

    #[test]
    fn test_first_leg_metrics() {
        let metrics = parse(
            r#"{"status": "OK", "routes": [{"legs": [{
                "distance": {"text": "1.2 km", "value": 1200},
                "duration": {"text": "2 mins", "value": 100},
                "duration_in_traffic": {"text": "3 mins", "value": 150}
            }]}]}"#,
        )
        .unwrap();
        assert_eq!(metrics.distance, 1200.0);
        assert_eq!(metrics.travel_time, 150.0);
        // 1200 / 150 * 3.6 = 28.8
        assert_eq!(metrics.speed, 29.0);
    }

    #[test]
    fn test_zero_duration_floored() {
        let metrics = RouteMetrics::from_leg(10.0, 0.0);
        assert_eq!(metrics.travel_time, 1.0);
        assert_eq!(metrics.speed, 36.0);
    }

    #[test]
    fn test_no_routes() {
        let err = parse(r#"{"status": "ZERO_RESULTS", "routes": []}"#).unwrap_err();
        assert!(matches!(err, DirectionsError::NoRoute(ref s) if s == "ZERO_RESULTS"));
    }

    #[test]
    fn test_missing_traffic_duration() {
        let err = parse(
            r#"{"routes": [{"legs": [{"distance": {"value": 5}, "duration": {"value": 5}}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DirectionsError::ParseError(_)));
    }

    #[test]
    fn test_client_creation() {
        let client = DirectionsClient::new(&DirectionsConfig::default(), "key".to_string());
        assert!(client.is_ok());
    }
}
