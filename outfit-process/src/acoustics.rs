//! Decibel arithmetic and road-traffic emission curves
//!
//! Levels are never added in dB. Contributions are converted to linear
//! power, summed, then converted back:
//!
//! ```text
//! P  = 10^(L / 10)
//! L  = 10 * log10(P)
//! ```
//!
//! Emission curves use the observed speed in km/h against a 70 km/h
//! reference:
//!
//! ```text
//! LwR  = Ar + Br * log10(v / 70)                  (rolling)
//! LwP  = Ap + Bp * (v - 70) / 70                  (propulsion)
//! Lwim = 10 * log10(10^(LwR/10) + 10^(LwP/10))    (single vehicle)
//! Lw   = Lwim + 10 * log10(n / (1000 * v))        (flow of n vehicles)
//! ```

use crate::models::CoefficientSet;

/// Reference speed of the emission curves (km/h)
pub const REFERENCE_SPEED_KMH: f64 = 70.0;

/// Sound power of a flow with no vehicles
pub const NO_CONTRIBUTION_DB: f64 = 0.0;

pub fn db_to_power(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

pub fn power_to_db(power: f64) -> f64 {
    10.0 * power.log10()
}

/// Energetic sum of levels in dB
pub fn energetic_sum<I>(levels: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    power_to_db(levels.into_iter().map(db_to_power).sum())
}

/// Rolling noise power (dB) of one vehicle at `speed` km/h
pub fn rolling_noise(coeffs: &CoefficientSet, speed: f64) -> f64 {
    coeffs.ar + coeffs.br * (speed / REFERENCE_SPEED_KMH).log10()
}

/// Propulsion noise power (dB) of one vehicle at `speed` km/h
pub fn propulsion_noise(coeffs: &CoefficientSet, speed: f64) -> f64 {
    coeffs.ap + coeffs.bp * (speed - REFERENCE_SPEED_KMH) / REFERENCE_SPEED_KMH
}

/// Combined rolling + propulsion power (dB) of one vehicle
pub fn vehicle_power(coeffs: &CoefficientSet, speed: f64) -> f64 {
    energetic_sum([rolling_noise(coeffs, speed), propulsion_noise(coeffs, speed)])
}

/// Sound power (dB) of `count` vehicles per hour travelling at `speed` km/h
///
/// An empty flow is exactly [`NO_CONTRIBUTION_DB`], whatever the speed.
/// Callers must check `speed > 0` before passing a positive count.
pub fn flow_sound_power(coeffs: &CoefficientSet, speed: f64, count: u64) -> f64 {
    if count == 0 {
        return NO_CONTRIBUTION_DB;
    }
    vehicle_power(coeffs, speed) + 10.0 * (count as f64 / (1000.0 * speed)).log10()
}
