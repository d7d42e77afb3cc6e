//! Octave frequency bands and per-band value arrays

use std::fmt;
use std::ops::{Index, IndexMut};

/// The eight octave bands every per-band table carries, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrequencyBand {
    Hz63,
    Hz125,
    Hz250,
    Hz500,
    Hz1000,
    Hz2000,
    Hz4000,
    Hz8000,
}

impl FrequencyBand {
    pub const ALL: [FrequencyBand; 8] = [
        FrequencyBand::Hz63,
        FrequencyBand::Hz125,
        FrequencyBand::Hz250,
        FrequencyBand::Hz500,
        FrequencyBand::Hz1000,
        FrequencyBand::Hz2000,
        FrequencyBand::Hz4000,
        FrequencyBand::Hz8000,
    ];

    /// Canonical column labels, matching `ALL`
    pub const LABELS: [&'static str; 8] =
        ["63", "125", "250", "500", "1000", "2000", "4000", "8000"];

    /// Centre frequency in Hz
    pub fn hz(self) -> u32 {
        match self {
            FrequencyBand::Hz63 => 63,
            FrequencyBand::Hz125 => 125,
            FrequencyBand::Hz250 => 250,
            FrequencyBand::Hz500 => 500,
            FrequencyBand::Hz1000 => 1000,
            FrequencyBand::Hz2000 => 2000,
            FrequencyBand::Hz4000 => 4000,
            FrequencyBand::Hz8000 => 8000,
        }
    }

    /// Canonical column label ("63", "125", ...)
    pub fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// One value per frequency band
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandLevels<T>([T; 8]);

impl<T> BandLevels<T> {
    pub fn new(values: [T; 8]) -> Self {
        Self(values)
    }

    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(FrequencyBand) -> T,
    {
        Self(std::array::from_fn(|i| f(FrequencyBand::ALL[i])))
    }

    /// Build from a fallible per-band function, stopping at the first error
    pub fn try_from_fn<E, F>(mut f: F) -> Result<Self, E>
    where
        T: Default,
        F: FnMut(FrequencyBand) -> Result<T, E>,
    {
        let mut levels = Self::from_fn(|_| T::default());
        for band in FrequencyBand::ALL {
            levels[band] = f(band)?;
        }
        Ok(levels)
    }

    pub fn map<U, F>(&self, mut f: F) -> BandLevels<U>
    where
        F: FnMut(FrequencyBand, &T) -> U,
    {
        BandLevels::from_fn(|band| f(band, &self[band]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrequencyBand, &T)> {
        FrequencyBand::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> &[T; 8] {
        &self.0
    }
}

impl<T> Index<FrequencyBand> for BandLevels<T> {
    type Output = T;

    fn index(&self, band: FrequencyBand) -> &T {
        &self.0[band.index()]
    }
}

impl<T> IndexMut<FrequencyBand> for BandLevels<T> {
    fn index_mut(&mut self, band: FrequencyBand) -> &mut T {
        &mut self.0[band.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_order_and_labels() {
        let hz: Vec<u32> = FrequencyBand::ALL.iter().map(|b| b.hz()).collect();
        assert_eq!(hz, vec![63, 125, 250, 500, 1000, 2000, 4000, 8000]);
        for band in FrequencyBand::ALL {
            assert_eq!(band.label(), band.hz().to_string());
        }
    }

    #[test]
    fn test_band_levels_indexing() {
        let mut levels = BandLevels::from_fn(|b| b.hz() as f64);
        assert_eq!(levels[FrequencyBand::Hz500], 500.0);
        levels[FrequencyBand::Hz500] = 1.0;
        assert_eq!(levels.values()[3], 1.0);
    }

    #[test]
    fn test_try_from_fn_stops_on_error() {
        let result: Result<BandLevels<u32>, String> = BandLevels::try_from_fn(|b| {
            if b == FrequencyBand::Hz1000 {
                Err("bad band".to_string())
            } else {
                Ok(b.hz())
            }
        });
        assert_eq!(result.unwrap_err(), "bad band");
    }

    #[test]
    fn test_try_from_fn_fills_every_band() {
        let levels: BandLevels<u32> =
            BandLevels::try_from_fn(|b| Ok::<_, String>(b.hz())).unwrap();
        assert_eq!(levels.values(), &[63, 125, 250, 500, 1000, 2000, 4000, 8000]);
    }
}
