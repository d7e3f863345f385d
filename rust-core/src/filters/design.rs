//! Low-pass filter design
//!
//! FIR filters use the windowing method (windowed sinc, unity DC gain).
//! IIR filters are Butterworth, mapped to the z-plane with the bilinear
//! transform after pre-warping the cutoff.

use super::windows::{generate_window, WindowType};
use crate::error::{DspError, DspResult};
use crate::units::{Frequency, FrequencyUnit};
use num_complex::Complex64;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// How the coefficients are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Windowed-sinc FIR with `order` taps
    Fir,

    /// Butterworth IIR of order `order - 1`
    Iir,

    /// User-supplied coefficients, used verbatim
    Custom,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::Fir, FilterKind::Iir, FilterKind::Custom];

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Fir => "FIR",
            FilterKind::Iir => "IIR",
            FilterKind::Custom => "custom",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| DspError::UnknownSymbol {
                kind: "filter kind",
                value: s.to_string(),
            })
    }
}

/// Filter settings chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    pub kind: FilterKind,

    /// Number of taps (`Ntaps`)
    pub order: usize,

    pub cutoff: Frequency,
}

impl FilterSpec {
    pub fn new(kind: FilterKind, order: usize, cutoff: Frequency) -> Self {
        Self {
            kind,
            order,
            cutoff,
        }
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            kind: FilterKind::Fir,
            order: 3,
            cutoff: Frequency::from_parts(100, FrequencyUnit::KHz),
        }
    }
}

/// Transfer function coefficients, H(z) = B(z) / A(z)
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    /// Feedback coefficients, a[0] != 0
    a: Vec<f64>,

    /// Feedforward coefficients
    b: Vec<f64>,
}

impl FilterCoefficients {
    /// Validate and wrap a coefficient pair
    pub fn new(b: Vec<f64>, a: Vec<f64>) -> DspResult<Self> {
        if b.is_empty() {
            return Err(DspError::CoefficientLength {
                name: "b",
                expected: 1,
                got: 0,
            });
        }
        match a.first() {
            None => {
                return Err(DspError::CoefficientLength {
                    name: "a",
                    expected: 1,
                    got: 0,
                })
            }
            Some(&a0) if a0 == 0.0 => return Err(DspError::ZeroLeadingCoefficient),
            Some(_) => {}
        }
        check_finite("b", &b)?;
        check_finite("a", &a)?;
        Ok(Self { a, b })
    }

    /// Feedback coefficients, never empty and a[0] != 0
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Feedforward coefficients, never empty
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Pass-through filter, b = a = [1]
    pub fn identity() -> Self {
        Self {
            a: vec![1.0],
            b: vec![1.0],
        }
    }

    /// Coefficients zero-padded to `len`
    ///
    /// Longer vectors are truncated.
    pub fn padded(&self, len: usize) -> (Vec<f64>, Vec<f64>) {
        (pad_to(&self.a, len), pad_to(&self.b, len))
    }
}

fn pad_to(values: &[f64], len: usize) -> Vec<f64> {
    let mut out = vec![0.0; len];
    let n = values.len().min(len);
    out[..n].copy_from_slice(&values[..n]);
    out
}

fn check_finite(name: &'static str, values: &[f64]) -> DspResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DspError::NonFiniteCoefficient { name, index }),
        None => Ok(()),
    }
}

/// Coefficients entered by the user for [`FilterKind::Custom`]
///
/// Both slots have a fixed length (`max_taps`).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomCoefficients {
    a: Vec<f64>,
    b: Vec<f64>,
}

impl CustomCoefficients {
    /// # Errors
    /// Configuration errors for a wrong slot length, `a[0] == 0` or
    /// non-finite entries.
    pub fn new(a: Vec<f64>, b: Vec<f64>, max_taps: usize) -> DspResult<Self> {
        for (name, v) in [("a", &a), ("b", &b)] {
            if v.len() != max_taps {
                return Err(DspError::CoefficientLength {
                    name,
                    expected: max_taps,
                    got: v.len(),
                });
            }
        }
        // max_taps >= 1, so a[0] exists
        if a[0] == 0.0 {
            return Err(DspError::ZeroLeadingCoefficient);
        }
        check_finite("a", &a)?;
        check_finite("b", &b)?;
        Ok(Self { a, b })
    }

    /// a = b = [1, 0, 0, ...]
    pub fn identity(max_taps: usize) -> Self {
        let mut unit = vec![0.0; max_taps.max(1)];
        unit[0] = 1.0;
        Self {
            a: unit.clone(),
            b: unit,
        }
    }

    pub fn a(&self) -> &[f64] {
        &self.a
    }

    pub fn b(&self) -> &[f64] {
        &self.b
    }

    pub fn to_coefficients(&self) -> FilterCoefficients {
        FilterCoefficients {
            a: self.a.clone(),
            b: self.b.clone(),
        }
    }
}

/// Cutoff as a fraction of Nyquist, required to be strictly inside (0, 1)
pub fn normalized_cutoff(cutoff_hz: f64, sample_rate_hz: f64) -> DspResult<f64> {
    let w = cutoff_hz / (sample_rate_hz / 2.0);
    if !(w > 0.0 && w < 1.0) {
        return Err(DspError::CutoffRatio(w));
    }
    Ok(w)
}

/// Design a lowpass FIR filter
///
/// # Arguments
/// * `numtaps` - Number of coefficients
/// * `cutoff` - Normalized cutoff (units of π rad/sample, Nyquist = 1)
/// * `window_type` - Window applied to the ideal response
///
/// # Returns
/// Coefficients h[n] for n = 0..numtaps-1, scaled so that sum(h) = 1
pub fn design_lowpass_fir(numtaps: usize, cutoff: f64, window_type: WindowType) -> Vec<f64> {
    let window = generate_window(window_type, numtaps);
    let center = (numtaps as f64 - 1.0) / 2.0;

    let mut h: Vec<f64> = (0..numtaps)
        .map(|n| {
            let n_shifted = n as f64 - center;
            // h_ideal[n] = wc * sinc(wc * n)
            let h_ideal = if n_shifted.abs() < 1e-10 {
                cutoff
            } else {
                (PI * cutoff * n_shifted).sin() / (PI * n_shifted)
            };
            h_ideal * window[n]
        })
        .collect();

    let dc_gain: f64 = h.iter().sum();
    for coeff in h.iter_mut() {
        *coeff /= dc_gain;
    }

    h
}

/// Coefficients of the monic polynomial with the given roots
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = coeffs.clone();
        next.push(Complex64::new(0.0, 0.0));
        for (i, &c) in coeffs.iter().enumerate() {
            next[i + 1] -= root * c;
        }
        coeffs = next;
    }
    coeffs
}

/// Design a Butterworth lowpass IIR filter
///
/// # Arguments
/// * `order` - Filter order (0 yields the identity filter)
/// * `cutoff` - Normalized cutoff (Nyquist = 1), the -3 dB point
///
/// # Returns
/// `(b, a)` with a[0] = 1
pub fn design_butterworth_lowpass(order: usize, cutoff: f64) -> (Vec<f64>, Vec<f64>) {
    if order == 0 {
        return (vec![1.0], vec![1.0]);
    }

    // Digital design with fs = 2, so the bilinear constant is 2*fs = 4.
    let fs2 = 4.0;
    let warped = fs2 * (PI * cutoff / 2.0).tan();
    let n = order as f64;

    // Analog prototype poles on the left half of the unit circle, scaled to the warped cutoff.
    let analog_poles: Vec<Complex64> = (0..order)
        .map(|i| {
            let m = -(n - 1.0) + 2.0 * i as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n)) * warped
        })
        .collect();

    let fs2c = Complex64::new(fs2, 0.0);
    let digital_poles: Vec<Complex64> = analog_poles
        .iter()
        .map(|&p| (fs2c + p) / (fs2c - p))
        .collect();
    // All analog zeros are at infinity and map to z = -1.
    let digital_zeros = vec![Complex64::new(-1.0, 0.0); order];

    let denom = analog_poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2c - p));
    let gain = (Complex64::new(warped.powi(order as i32), 0.0) / denom).re;

    let b = poly(&digital_zeros).iter().map(|c| c.re * gain).collect();
    let a = poly(&digital_poles).iter().map(|c| c.re).collect();

    (b, a)
}

/// Produce coefficients for the requested filter
///
/// # Arguments
/// * `kind` - FIR, IIR or custom
/// * `order` - Number of taps, in [1, max_taps]
/// * `cutoff_hz` - Cutoff frequency in Hz
/// * `sample_rate_hz` - Sample rate in Hz
/// * `custom` - Coefficients used when `kind` is [`FilterKind::Custom`]
/// * `max_taps` - Upper bound on `order`
/// * `window_type` - Window used by FIR design
///
/// # Errors
/// Domain errors for an invalid order or a cutoff outside (0, Nyquist).
/// Custom filters bypass the cutoff check since nothing is designed.
pub fn design(
    kind: FilterKind,
    order: usize,
    cutoff_hz: f64,
    sample_rate_hz: f64,
    custom: &CustomCoefficients,
    max_taps: usize,
    window_type: WindowType,
) -> DspResult<FilterCoefficients> {
    if order == 0 || order > max_taps {
        return Err(DspError::InvalidOrder {
            order,
            max: max_taps,
        });
    }

    match kind {
        FilterKind::Fir => {
            let w = normalized_cutoff(cutoff_hz, sample_rate_hz)?;
            tracing::debug!(order, w, ?window_type, "designing FIR lowpass");
            let b = design_lowpass_fir(order, w, window_type);
            Ok(FilterCoefficients { a: vec![1.0], b })
        }
        FilterKind::Iir => {
            let w = normalized_cutoff(cutoff_hz, sample_rate_hz)?;
            tracing::debug!(order = order - 1, w, "designing Butterworth lowpass");
            let (b, a) = design_butterworth_lowpass(order - 1, w);
            Ok(FilterCoefficients { a, b })
        }
        FilterKind::Custom => Ok(custom.to_coefficients()),
    }
}

/// Render coefficients for display, `%+06.3f` followed by two spaces per value
pub fn format_coefficients(values: &[f64]) -> String {
    values.iter().fold(String::new(), |mut out, v| {
        out.push_str(&format!("{:+06.3}  ", v));
        out
    })
}

/// Display strings for the most recently designed (non-custom) filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoefficientDisplay {
    pub a: String,
    pub b: String,
}

impl CoefficientDisplay {
    pub fn from_coefficients(coeffs: &FilterCoefficients) -> Self {
        Self {
            a: format_coefficients(&coeffs.a),
            b: format_coefficients(&coeffs.b),
        }
    }
}

impl Default for CoefficientDisplay {
    fn default() -> Self {
        Self {
            a: "1".to_string(),
            b: "1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> CustomCoefficients {
        CustomCoefficients::identity(6)
    }

    #[test]
    fn test_lowpass_fir_three_taps() {
        let h = design_lowpass_fir(3, 0.5, WindowType::Hamming);

        // Hamming(3) = [0.08, 1, 0.08], ideal = [0.5*sinc(0.5), 0.5, 0.5*sinc(0.5)]
        let edge = 0.5 * (2.0 / PI) * 0.08;
        let sum = 2.0 * edge + 0.5;
        assert!((h[0] - edge / sum).abs() < 1e-12);
        assert!((h[1] - 0.5 / sum).abs() < 1e-12);
        assert!((h[2] - h[0]).abs() < 1e-15);
    }

    #[test]
    fn test_lowpass_design() {
        let h = design_lowpass_fir(6, 0.2, WindowType::Hamming);

        assert_eq!(h.len(), 6);
        for i in 0..h.len() / 2 {
            assert!((h[i] - h[h.len() - 1 - i]).abs() < 1e-12);
        }

        let sum: f64 = h.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fir_order_one() {
        let coeffs = design(FilterKind::Fir, 1, 100e3, 1e6, &custom(), 6, WindowType::Hamming)
            .unwrap();

        assert_eq!(coeffs.a(), &[1.0]);
        assert_eq!(coeffs.b().len(), 1);
        let sum: f64 = coeffs.b().iter().sum();
        assert!((sum - coeffs.b()[0]).abs() < 1e-15);
        assert!((coeffs.b()[0] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_butterworth_first_order() {
        let (b, a) = design_butterworth_lowpass(1, 0.5);

        assert!((b[0] - 0.5).abs() < 1e-12);
        assert!((b[1] - 0.5).abs() < 1e-12);
        assert!((a[0] - 1.0).abs() < 1e-12);
        assert!(a[1].abs() < 1e-12);
    }

    #[test]
    fn test_butterworth_second_order() {
        let (b, a) = design_butterworth_lowpass(2, 0.5);

        // Reference values for a 2nd order Butterworth at half Nyquist
        let expected_b = [0.29289321881345254, 0.5857864376269051, 0.29289321881345254];
        let expected_a = [1.0, 0.0, 0.17157287525380993];
        for i in 0..3 {
            assert!((b[i] - expected_b[i]).abs() < 1e-9, "b[{}] = {}", i, b[i]);
            assert!((a[i] - expected_a[i]).abs() < 1e-9, "a[{}] = {}", i, a[i]);
        }
    }

    #[test]
    fn test_butterworth_unity_dc_gain() {
        for order in 1..=5 {
            let (b, a) = design_butterworth_lowpass(order, 0.2);
            assert_eq!(b.len(), order + 1);
            assert_eq!(a.len(), order + 1);
            assert_eq!(a[0], 1.0);

            let gain = b.iter().sum::<f64>() / a.iter().sum::<f64>();
            assert!((gain - 1.0).abs() < 1e-9, "order {} gain {}", order, gain);
        }
    }

    #[test]
    fn test_iir_single_tap_is_identity() {
        let coeffs = design(FilterKind::Iir, 1, 100e3, 1e6, &custom(), 6, WindowType::Hamming)
            .unwrap();
        assert_eq!(coeffs, FilterCoefficients::identity());
    }

    #[test]
    fn test_design_rejects_bad_order() {
        for order in [0, 7] {
            let err = design(FilterKind::Fir, order, 100e3, 1e6, &custom(), 6, WindowType::Hamming)
                .unwrap_err();
            assert_eq!(err, DspError::InvalidOrder { order, max: 6 });
        }
    }

    #[test]
    fn test_design_rejects_cutoff_above_nyquist() {
        let err = design(FilterKind::Iir, 3, 500e3, 1e6, &custom(), 6, WindowType::Hamming)
            .unwrap_err();
        assert_eq!(err, DspError::CutoffRatio(1.0));
        assert!(err.is_domain());

        assert!(normalized_cutoff(600e3, 1e6).is_err());
        assert!((normalized_cutoff(100e3, 1e6).unwrap() - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_custom_ignores_cutoff() {
        let user = CustomCoefficients::new(
            vec![1.0, -0.5, 0.0, 0.0, 0.0, 0.0],
            vec![0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
            6,
        )
        .unwrap();
        let coeffs = design(FilterKind::Custom, 2, 900e3, 1e6, &user, 6, WindowType::Hamming)
            .unwrap();
        assert_eq!(coeffs.a(), user.a());
        assert_eq!(coeffs.b(), user.b());
    }

    #[test]
    fn test_custom_validation() {
        let err = CustomCoefficients::new(vec![1.0; 5], vec![1.0; 6], 6).unwrap_err();
        assert_eq!(
            err,
            DspError::CoefficientLength {
                name: "a",
                expected: 6,
                got: 5
            }
        );
        assert!(err.is_configuration());

        let err = CustomCoefficients::new(vec![0.0; 6], vec![1.0; 6], 6).unwrap_err();
        assert_eq!(err, DspError::ZeroLeadingCoefficient);

        let mut b = vec![0.0; 6];
        b[3] = f64::NAN;
        let err = CustomCoefficients::new(vec![1.0; 6], b, 6).unwrap_err();
        assert_eq!(err, DspError::NonFiniteCoefficient { name: "b", index: 3 });
    }

    #[test]
    fn test_coefficients_validation_and_padding() {
        assert!(FilterCoefficients::new(vec![], vec![1.0]).is_err());
        assert_eq!(
            FilterCoefficients::new(vec![1.0], vec![]).unwrap_err(),
            DspError::CoefficientLength {
                name: "a",
                expected: 1,
                got: 0
            }
        );
        assert_eq!(
            FilterCoefficients::new(vec![1.0], vec![1.0, f64::NAN]).unwrap_err(),
            DspError::NonFiniteCoefficient { name: "a", index: 1 }
        );
        assert_eq!(
            FilterCoefficients::new(vec![1.0], vec![0.0, 1.0]).unwrap_err(),
            DspError::ZeroLeadingCoefficient
        );

        let coeffs = FilterCoefficients::new(vec![0.25, 0.5, 0.25], vec![1.0]).unwrap();
        let (a, b) = coeffs.padded(6);
        assert_eq!(a, vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(b, vec![0.25, 0.5, 0.25, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_format_coefficients() {
        assert_eq!(format_coefficients(&[1.0]), "+1.000  ");
        assert_eq!(
            format_coefficients(&[0.2928932, -1.5, 0.0]),
            "+0.293  -1.500  +0.000  "
        );
        assert_eq!(format_coefficients(&[12.34567]), "+12.346  ");

        let display = CoefficientDisplay::default();
        assert_eq!(display.a, "1");
        assert_eq!(display.b, "1");
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("IIR".parse::<FilterKind>().unwrap(), FilterKind::Iir);
        assert_eq!("custom".parse::<FilterKind>().unwrap(), FilterKind::Custom);
        assert!("fir".parse::<FilterKind>().is_err());
    }
}
