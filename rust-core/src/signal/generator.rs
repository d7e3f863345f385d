//! Test signal synthesis
//!
//! Produces the time base and one of six stimulus waveforms sampled on it.

use crate::error::{DspError, DspResult};
use crate::units::{Frequency, FrequencyUnit};
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Stimulus shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// sin(2πft)
    Sine,

    /// sign(sin(2πft)), with sign(0) = 0
    Square,

    /// Running sum of the square wave, rescaled to span [-1, 1]
    Triangle,

    /// Linear sweep across [f - span/2, f + span/2]
    Chirp,

    /// Uniform samples in [-1, 1)
    Noise,

    /// x[1] = 1, everything else 0
    Impulse,
}

impl Waveform {
    pub const ALL: [Waveform; 6] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Chirp,
        Waveform::Noise,
        Waveform::Impulse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Chirp => "chirp",
            Waveform::Noise => "noise",
            Waveform::Impulse => "impulse",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Waveform::ALL
            .iter()
            .copied()
            .find(|w| w.name() == s)
            .ok_or_else(|| DspError::UnknownSymbol {
                kind: "waveform",
                value: s.to_string(),
            })
    }
}

/// Input signal parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSpec {
    pub waveform: Waveform,

    /// Fundamental (or chirp centre) frequency
    pub freq: Frequency,

    /// Sweep width, only used by [`Waveform::Chirp`]
    pub span: Frequency,
}

impl SignalSpec {
    pub fn new(waveform: Waveform, freq: Frequency, span: Frequency) -> Self {
        Self {
            waveform,
            freq,
            span,
        }
    }
}

impl Default for SignalSpec {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            freq: Frequency::from_parts(1, FrequencyUnit::KHz),
            span: Frequency::from_parts(500, FrequencyUnit::Hz),
        }
    }
}

/// Sample instants t[i] = i / fs
pub fn time_base(sample_rate_hz: f64, npts: usize) -> Vec<f64> {
    (0..npts).map(|i| i as f64 / sample_rate_hz).collect()
}

/// Unit impulse of length `npts` with the spike at index 1
pub fn unit_impulse(npts: usize) -> Vec<f64> {
    let mut x = vec![0.0; npts];
    if npts > 1 {
        x[1] = 1.0;
    }
    x
}

/// Sign with sign(0) = 0
#[inline]
fn signum_zero(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn square_wave(t: &[f64], freq_hz: f64) -> Vec<f64> {
    t.iter()
        .map(|&ti| signum_zero((2.0 * PI * freq_hz * ti).sin()))
        .collect()
}

/// Integrate the square wave and rescale so the result spans exactly [-1, 1]
fn triangle_wave(t: &[f64], freq_hz: f64) -> DspResult<Vec<f64>> {
    let mut acc = 0.0;
    let raw: Vec<f64> = square_wave(t, freq_hz)
        .into_iter()
        .map(|s| {
            acc += s;
            acc
        })
        .collect();

    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;
    if !(range > 0.0) {
        return Err(DspError::DegenerateTriangle);
    }

    let scaled: Vec<f64> = raw.iter().map(|&r| r * 2.0 / range).collect();
    let scaled_max = scaled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let offset = 1.0 - scaled_max;
    Ok(scaled.into_iter().map(|s| s + offset).collect())
}

fn chirp_wave(t: &[f64], freq_hz: f64, span_hz: f64) -> Vec<f64> {
    let npts = t.len() as f64;
    let start = freq_hz - span_hz / 2.0;
    t.iter()
        .enumerate()
        .map(|(i, &ti)| {
            let inst_freq = start + i as f64 * span_hz / npts;
            (ti * (2.0 * PI * inst_freq)).sin()
        })
        .collect()
}

/// Sample the waveform described by `spec` on the time base `t`
///
/// # Arguments
/// * `t` - Sample instants from [`time_base`]
/// * `spec` - Waveform and frequency settings
/// * `rng` - Randomness source, only drawn from for [`Waveform::Noise`]
///
/// # Errors
/// [`DspError::DegenerateTriangle`] when a triangle is requested over a
/// constant square wave.
pub fn generate_waveform<R: Rng + ?Sized>(
    t: &[f64],
    spec: &SignalSpec,
    rng: &mut R,
) -> DspResult<Vec<f64>> {
    let freq_hz = spec.freq.hz();

    let x = match spec.waveform {
        Waveform::Sine => t.iter().map(|&ti| (2.0 * PI * freq_hz * ti).sin()).collect(),
        Waveform::Square => square_wave(t, freq_hz),
        Waveform::Triangle => triangle_wave(t, freq_hz)?,
        Waveform::Chirp => chirp_wave(t, freq_hz, spec.span.hz()),
        Waveform::Noise => t
            .iter()
            .map(|_| rng.random::<f64>() * 2.0 - 1.0)
            .collect(),
        Waveform::Impulse => unit_impulse(t.len()),
    };

    Ok(x)
}

/// Generate the time base and the input waveform in one call
pub fn generate<R: Rng + ?Sized>(
    sample_rate_hz: f64,
    npts: usize,
    spec: &SignalSpec,
    rng: &mut R,
) -> DspResult<(Vec<f64>, Vec<f64>)> {
    let t = time_base(sample_rate_hz, npts);
    let x = generate_waveform(&t, spec, rng)?;
    Ok((t, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spec(waveform: Waveform, freq: u32, unit: FrequencyUnit) -> SignalSpec {
        SignalSpec::new(
            waveform,
            Frequency::new(freq, unit).unwrap(),
            Frequency::new(500, FrequencyUnit::Hz).unwrap(),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_time_base() {
        let t = time_base(1e6, 4);
        assert_eq!(t, vec![0.0, 1e-6, 2e-6, 3e-6]);
    }

    #[test]
    fn test_sine_matches_closed_form() {
        let s = spec(Waveform::Sine, 1, FrequencyUnit::KHz);
        let (t, x) = generate(1e6, 1024, &s, &mut rng()).unwrap();

        assert_eq!(t.len(), 1024);
        assert_eq!(x.len(), 1024);
        for i in 0..1024 {
            let expected = (2.0 * PI * 1000.0 * (i as f64 / 1e6)).sin();
            assert_eq!(x[i], expected, "sample {}", i);
        }
    }

    #[test]
    fn test_square_levels() {
        let s = spec(Waveform::Square, 1, FrequencyUnit::KHz);
        let (_, x) = generate(1e6, 1024, &s, &mut rng()).unwrap();

        // sin(0) == 0 exactly, so the first sample takes the zero sign
        assert_eq!(x[0], 0.0);
        assert!(x[1..].iter().all(|&v| v == 1.0 || v == -1.0));
        assert_eq!(x[1], 1.0);
        // second half-period of a 1 kHz wave at 1 MHz starts at sample 500
        assert_eq!(x[600], -1.0);
    }

    #[test]
    fn test_signum_zero() {
        assert_eq!(signum_zero(0.0), 0.0);
        assert_eq!(signum_zero(-0.0), 0.0);
        assert_eq!(signum_zero(1e-300), 1.0);
        assert_eq!(signum_zero(-2.0), -1.0);
    }

    #[test]
    fn test_triangle_spans_unit_range() {
        let s = spec(Waveform::Triangle, 2, FrequencyUnit::KHz);
        let (_, x) = generate(1e6, 1024, &s, &mut rng()).unwrap();

        let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = x.iter().copied().fold(f64::INFINITY, f64::min);
        assert!((max - 1.0).abs() < 1e-12);
        assert!((min + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_degenerate() {
        // every sample at t = 0 gives an all-zero square wave
        let t = vec![0.0; 8];
        let s = spec(Waveform::Triangle, 1, FrequencyUnit::KHz);
        let err = generate_waveform(&t, &s, &mut rng()).unwrap_err();
        assert_eq!(err, DspError::DegenerateTriangle);
        assert!(err.is_domain());
    }

    #[test]
    fn test_chirp_instantaneous_frequency() {
        let npts = 256;
        let s = SignalSpec::new(
            Waveform::Chirp,
            Frequency::new(10, FrequencyUnit::KHz).unwrap(),
            Frequency::new(4, FrequencyUnit::KHz).unwrap(),
        );
        let (t, x) = generate(1e6, npts, &s, &mut rng()).unwrap();

        for i in [0usize, 17, 128, 255] {
            let f_i = 8e3 + i as f64 * 4e3 / npts as f64;
            let expected = (t[i] * (2.0 * PI * f_i)).sin();
            assert!((x[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_noise_range_and_seeding() {
        let s = spec(Waveform::Noise, 1, FrequencyUnit::KHz);
        let (_, a) = generate(1e6, 1024, &s, &mut rng()).unwrap();
        let (_, b) = generate(1e6, 1024, &s, &mut rng()).unwrap();

        assert!(a.iter().all(|&v| (-1.0..1.0).contains(&v)));
        assert_eq!(a, b);
        // not degenerate
        assert!(a.iter().any(|&v| v > 0.5) && a.iter().any(|&v| v < -0.5));
    }

    #[test]
    fn test_impulse_shape() {
        let s = spec(Waveform::Impulse, 1, FrequencyUnit::KHz);
        let (_, x) = generate(1e6, 64, &s, &mut rng()).unwrap();

        assert_eq!(x[0], 0.0);
        assert_eq!(x[1], 1.0);
        assert!(x[2..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_parse_waveform() {
        assert_eq!("chirp".parse::<Waveform>().unwrap(), Waveform::Chirp);
        assert!("sawtooth".parse::<Waveform>().is_err());
    }
}
