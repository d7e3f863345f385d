//! FFT engine using realfft for real-valued sequences
//!
//! Used to sample the DTFT of short coefficient vectors on a uniform grid.

use crate::error::{DspError, DspResult};
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Compute the spectrum of a real sequence
    ///
    /// Sequences longer than the FFT size are wrapped (time-aliased) onto it,
    /// which keeps each bin equal to the sequence's DTFT at 2πk/fft_size.
    ///
    /// # Returns
    /// X[k] for k = 0..=fft_size/2 (positive frequencies only)
    pub fn compute_spectrum(&mut self, sequence: &[f64]) -> DspResult<&[Complex64]> {
        self.input_buffer.fill(0.0);
        for (n, &value) in sequence.iter().enumerate() {
            self.input_buffer[n % self.fft_size] += value;
        }

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| DspError::Fft(e.to_string()))?;

        Ok(&self.output_buffer)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}
