//! Frequency units and the parameter quantities built on them
//!
//! Every frequency the engine sees (sample rate, input frequency, chirp span,
//! filter cutoff) goes through [`FrequencyUnit::to_hz`].

use crate::error::{DspError, DspResult};
use std::fmt;
use std::str::FromStr;

/// Unit symbol attached to a frequency value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyUnit {
    Hz,
    KHz,
    MHz,
    GHz,
}

impl FrequencyUnit {
    pub const ALL: [FrequencyUnit; 4] = [
        FrequencyUnit::Hz,
        FrequencyUnit::KHz,
        FrequencyUnit::MHz,
        FrequencyUnit::GHz,
    ];

    /// Scale factor from this unit to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }

    /// Convert `value` expressed in this unit to Hz
    #[inline]
    pub fn to_hz(&self, value: f64) -> f64 {
        value * self.multiplier()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for FrequencyUnit {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrequencyUnit::ALL
            .iter()
            .copied()
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| DspError::UnknownSymbol {
                kind: "unit",
                value: s.to_string(),
            })
    }
}

/// Convert a (value, unit) pair to Hz
pub fn to_hz(value: f64, unit: FrequencyUnit) -> f64 {
    unit.to_hz(value)
}

/// Allowed sample-rate magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateMagnitude {
    One,
    Two,
    Five,
    Ten,
    Twenty,
    Fifty,
    OneHundred,
    TwoHundred,
    FiveHundred,
}

impl RateMagnitude {
    pub const ALL: [RateMagnitude; 9] = [
        RateMagnitude::One,
        RateMagnitude::Two,
        RateMagnitude::Five,
        RateMagnitude::Ten,
        RateMagnitude::Twenty,
        RateMagnitude::Fifty,
        RateMagnitude::OneHundred,
        RateMagnitude::TwoHundred,
        RateMagnitude::FiveHundred,
    ];

    pub fn value(&self) -> u32 {
        match self {
            RateMagnitude::One => 1,
            RateMagnitude::Two => 2,
            RateMagnitude::Five => 5,
            RateMagnitude::Ten => 10,
            RateMagnitude::Twenty => 20,
            RateMagnitude::Fifty => 50,
            RateMagnitude::OneHundred => 100,
            RateMagnitude::TwoHundred => 200,
            RateMagnitude::FiveHundred => 500,
        }
    }
}

impl TryFrom<u32> for RateMagnitude {
    type Error = DspError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        RateMagnitude::ALL
            .iter()
            .copied()
            .find(|m| m.value() == value)
            .ok_or_else(|| DspError::UnknownSymbol {
                kind: "sample rate magnitude",
                value: value.to_string(),
            })
    }
}

impl FromStr for RateMagnitude {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || DspError::UnknownSymbol {
            kind: "sample rate magnitude",
            value: s.to_string(),
        };
        let value: u32 = s.trim().parse().map_err(|_| unknown())?;
        RateMagnitude::try_from(value).map_err(|_| unknown())
    }
}

/// Sample rate as chosen from the fixed magnitude set plus a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRateSpec {
    pub value: RateMagnitude,
    pub unit: FrequencyUnit,
}

impl SampleRateSpec {
    pub fn new(value: RateMagnitude, unit: FrequencyUnit) -> Self {
        Self { value, unit }
    }

    /// Sample rate in Hz (always positive)
    pub fn hz(&self) -> f64 {
        self.unit.to_hz(self.value.value() as f64)
    }
}

impl Default for SampleRateSpec {
    fn default() -> Self {
        Self::new(RateMagnitude::One, FrequencyUnit::MHz)
    }
}

/// Integer frequency setting in [1, 1000] with a unit
///
/// Used for the input frequency, the chirp span and the filter cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frequency {
    value: u32,
    unit: FrequencyUnit,
}

impl Frequency {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 1000;

    pub fn new(value: u32, unit: FrequencyUnit) -> DspResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DspError::OutOfRange {
                name: "frequency setting",
                value: value as f64,
                min: Self::MIN as f64,
                max: Self::MAX as f64,
            });
        }
        Ok(Self { value, unit })
    }

    /// Caller guarantees `value` is within [MIN, MAX]
    pub(crate) const fn from_parts(value: u32, unit: FrequencyUnit) -> Self {
        Self { value, unit }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    pub fn hz(&self) -> f64 {
        self.unit.to_hz(self.value as f64)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers() {
        assert_eq!(to_hz(3.0, FrequencyUnit::Hz), 3.0);
        assert_eq!(to_hz(3.0, FrequencyUnit::KHz), 3e3);
        assert_eq!(to_hz(3.0, FrequencyUnit::MHz), 3e6);
        assert_eq!(to_hz(3.0, FrequencyUnit::GHz), 3e9);
    }

    #[test]
    fn test_khz_is_thousand_hz() {
        for magnitude in RateMagnitude::ALL {
            let v = magnitude.value() as f64;
            assert_eq!(to_hz(v, FrequencyUnit::KHz), 1000.0 * to_hz(v, FrequencyUnit::Hz));
        }
    }

    #[test]
    fn test_monotonic_in_value() {
        for unit in FrequencyUnit::ALL {
            let rates: Vec<f64> = RateMagnitude::ALL
                .iter()
                .map(|m| SampleRateSpec::new(*m, unit).hz())
                .collect();
            assert!(rates.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(rates[0] > 0.0);
        }
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!("kHz".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::KHz);
        assert_eq!("GHz".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::GHz);
        assert!("khz".parse::<FrequencyUnit>().is_err());
        assert_eq!("200".parse::<RateMagnitude>().unwrap(), RateMagnitude::TwoHundred);
        assert!("3".parse::<RateMagnitude>().is_err());
        assert!(RateMagnitude::try_from(1000).is_err());
    }

    #[test]
    fn test_frequency_bounds() {
        assert!(Frequency::new(0, FrequencyUnit::Hz).is_err());
        assert!(Frequency::new(1001, FrequencyUnit::Hz).is_err());

        let f = Frequency::new(100, FrequencyUnit::KHz).unwrap();
        assert_eq!(f.hz(), 100e3);
        assert_eq!(f.to_string(), "100 kHz");
    }

    #[test]
    fn test_default_sample_rate() {
        assert_eq!(SampleRateSpec::default().hz(), 1e6);
    }
}
