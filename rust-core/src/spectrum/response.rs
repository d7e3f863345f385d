//! Impulse and frequency response of a designed filter

use super::fft::FftEngine;
use crate::error::{DspError, DspResult};
use crate::filters::{apply, FilterCoefficients};
use crate::signal::unit_impulse;
use num_complex::Complex64;

/// Response to the unit impulse (h[0] = 0, h[1] = 1), same length as `npts`
pub fn impulse_response(coeffs: &FilterCoefficients, npts: usize) -> Vec<f64> {
    apply(coeffs, &unit_impulse(npts))
}

/// Frequency axis f[i] = i * fs / (2 * npts), covering [0, fs/2)
pub fn frequency_axis(sample_rate_hz: f64, npts: usize) -> Vec<f64> {
    let step = sample_rate_hz / (2.0 * npts as f64);
    (0..npts).map(|i| i as f64 * step).collect()
}

/// Sample H(e^jω) = B(e^jω) / A(e^jω) at ω_i = π * i / npts
///
/// `fft` must have size `2 * npts`; both polynomials are evaluated with one
/// real FFT each.
pub fn frequency_response(
    coeffs: &FilterCoefficients,
    fft: &mut FftEngine,
) -> DspResult<Vec<Complex64>> {
    if fft.fft_size() % 2 != 0 {
        return Err(DspError::Fft(format!(
            "frequency response needs an even FFT size, got {}",
            fft.fft_size()
        )));
    }
    // bins 0..npts, Nyquist bin dropped
    let npts = fft.num_bins() - 1;

    let numerator: Vec<Complex64> = fft.compute_spectrum(coeffs.b())?[..npts].to_vec();
    let denominator = &fft.compute_spectrum(coeffs.a())?[..npts];

    Ok(numerator
        .iter()
        .zip(denominator.iter())
        .map(|(num, den)| num / den)
        .collect())
}

/// Evaluate H(e^jω) directly at one normalized angular frequency (rad/sample)
pub fn transfer_at(coeffs: &FilterCoefficients, omega: f64) -> Complex64 {
    let eval = |poly: &[f64]| -> Complex64 {
        poly.iter()
            .enumerate()
            .map(|(n, &c)| c * Complex64::from_polar(1.0, -omega * n as f64))
            .sum()
    };
    eval(coeffs.b()) / eval(coeffs.a())
}

/// |H| with the DC bin forced to zero so it cannot dominate the plot scale
pub fn magnitude(response: &[Complex64]) -> Vec<f64> {
    let mut mag: Vec<f64> = response.iter().map(|c| c.norm()).collect();
    if let Some(dc) = mag.first_mut() {
        *dc = 0.0;
    }
    mag
}

/// Phase of H in degrees, evaluated per point without unwrapping
///
/// Takes the unmodified H, so the DC entry is the true phase at ω = 0 rather
/// than the angle of the zeroed magnitude bin.
pub fn phase(response: &[Complex64]) -> Vec<f64> {
    response.iter().map(|c| c.arg().to_degrees()).collect()
}
