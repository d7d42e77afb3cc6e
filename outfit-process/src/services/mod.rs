//! Pipeline stages
//!
//! Preparation (run once per process, building the `ModelContext`):
//! - `street_normalizer`: class shares and unit conversion
//! - `coefficient_parser`: "Ar;Br;Ap;Bp" emission cells
//! - `attenuation_normalizer`: external matrix headers and period codes
//!
//! Batch (run once per observation table, in this order):
//! - `flow_estimator`
//! - `sound_power`
//! - `attenuation_applier`
//! - `receiver_aggregator`

pub mod attenuation_applier;
pub mod attenuation_normalizer;
pub mod coefficient_parser;
pub mod flow_estimator;
pub mod receiver_aggregator;
pub mod sound_power;
pub mod street_normalizer;

pub use attenuation_applier::apply_attenuation;
pub use attenuation_normalizer::normalize_attenuation;
pub use coefficient_parser::{parse_coefficient_set, parse_coefficient_table};
pub use flow_estimator::estimate_flows;
pub use receiver_aggregator::aggregate_receivers;
pub use sound_power::compute_sound_power;
pub use street_normalizer::normalize_street_params;
