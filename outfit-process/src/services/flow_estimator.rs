//! Traffic flow estimation
//!
//! Inverts a BPR-style volume-delay function. Given the observed travel
//! time `t`, the free-flow time `t0 = d / v_free` and the street's shape
//! parameters:
//!
//! ```text
//! t = t0 * (1 + alpha * (q / C)^beta)
//! q / C = max(0, (t / t0 - 1) / alpha)^(1 / beta)
//! ```
//!
//! The class count is `floor(C * q/C * share)`.

use crate::models::{FlowEstimate, StreetParameter, StreetParameterIndex, VehicleClass};
use outfit_common::TrafficObservation;
use tracing::warn;

/// Implied volume as a fraction of capacity, or `None` if not a finite number
///
/// `distance` in metres, `travel_time` in seconds, `free_speed` in m/s.
/// A basis below zero (faster than free flow) means no excess flow.
pub fn flow_factor(
    distance: f64,
    travel_time: f64,
    free_speed: f64,
    alpha: f64,
    beta: f64,
) -> Option<f64> {
    let free_flow_time = distance / free_speed;
    let ratio = travel_time / free_flow_time - 1.0;
    let basis = ratio / alpha;
    if !basis.is_finite() {
        return None;
    }
    let factor = basis.max(0.0).powf(1.0 / beta);
    factor.is_finite().then_some(factor)
}

/// Vehicles of one class implied by an observation on a street
pub fn vehicle_count(observation: &TrafficObservation, param: &StreetParameter) -> Option<u64> {
    let factor = flow_factor(
        observation.distance,
        observation.travel_time,
        param.free_speed,
        param.alpha,
        param.beta,
    )?;
    let count = (param.capacity * factor * param.share).floor();
    (count.is_finite() && count >= 0.0).then_some(count as u64)
}

/// Join observations to street parameters and estimate per-class counts
///
/// Observations without street parameters still produce one row per class,
/// with no count.
pub fn estimate_flows(
    observations: &[TrafficObservation],
    params: &StreetParameterIndex,
) -> Vec<FlowEstimate> {
    let mut flows = Vec::with_capacity(observations.len() * VehicleClass::ALL.len());
    let mut unmatched = 0usize;
    let mut non_finite = 0usize;

    for obs in observations {
        let group = params.lookup(&obs.highway, obs.daytime);
        if group.is_empty() {
            unmatched += 1;
            flows.extend(VehicleClass::ALL.iter().map(|&class| FlowEstimate {
                segment_id: obs.id.clone(),
                name: obs.name.clone(),
                speed: obs.speed,
                vehicle_class: class,
                vehicle_count: None,
            }));
            continue;
        }

        for param in group {
            let count = vehicle_count(obs, param);
            if count.is_none() {
                non_finite += 1;
            }
            flows.push(FlowEstimate {
                segment_id: obs.id.clone(),
                name: obs.name.clone(),
                speed: obs.speed,
                vehicle_class: param.vehicle_class,
                vehicle_count: count,
            });
        }
    }

    if unmatched > 0 {
        warn!(
            unmatched,
            "Observations without street parameters for their highway/daytime"
        );
    }
    if non_finite > 0 {
        warn!(rows = non_finite, "Flow estimates that are not finite numbers");
    }

    flows
}
