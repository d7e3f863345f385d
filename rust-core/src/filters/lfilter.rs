//! Linear filtering with the direct-form difference equation
//!
//! a[0]*y[n] = Σ b[k]*x[n-k] - Σ_{k>=1} a[k]*y[n-k], zero initial conditions.
//! Implemented as transposed direct form II, one delay line of length
//! max(len(a), len(b)) - 1.

use super::design::FilterCoefficients;

/// Stateful IIR/FIR filter
pub struct LinearFilter {
    /// Feedforward coefficients, normalized by a[0] and padded to `order + 1`
    b: Vec<f64>,

    /// Feedback coefficients, normalized by a[0] and padded to `order + 1`
    a: Vec<f64>,

    /// Delay line z[0..order]
    state: Vec<f64>,
}

impl LinearFilter {
    /// Create a filter from validated coefficients
    pub fn new(coeffs: &FilterCoefficients) -> Self {
        let len = coeffs.a().len().max(coeffs.b().len());
        let a0 = coeffs.a()[0];

        let mut b = vec![0.0; len];
        let mut a = vec![0.0; len];
        for (dst, &src) in b.iter_mut().zip(coeffs.b().iter()) {
            *dst = src / a0;
        }
        for (dst, &src) in a.iter_mut().zip(coeffs.a().iter()) {
            *dst = src / a0;
        }

        Self {
            b,
            a,
            state: vec![0.0; len - 1],
        }
    }

    /// Process single sample
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let order = self.state.len();
        if order == 0 {
            return self.b[0] * input;
        }

        let output = self.b[0] * input + self.state[0];
        for k in 0..order - 1 {
            self.state[k] = self.b[k + 1] * input + self.state[k + 1] - self.a[k + 1] * output;
        }
        self.state[order - 1] = self.b[order] * input - self.a[order] * output;

        output
    }

    /// Process a block of samples
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Process a block in-place
    pub fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

/// Filter `x` from rest with the given coefficients
///
/// The output has the same length as the input.
pub fn apply(coeffs: &FilterCoefficients, x: &[f64]) -> Vec<f64> {
    LinearFilter::new(coeffs).process_block(x)
}
