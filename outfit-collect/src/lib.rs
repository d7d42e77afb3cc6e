//! outfit-collect library interface
//!
//! Collects current travel times for a list of road segments from a
//! directions service and produces the observation table consumed by the
//! noise model.

pub mod collector;
pub mod directions;

pub use collector::{collect_observations, resolve_api_key, SegmentRow, API_KEY_ENV_VAR};
pub use directions::{DirectionsClient, DirectionsError, RouteMetrics};
