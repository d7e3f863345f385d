//! Engine construction parameters

use crate::error::{DspError, DspResult};
use crate::filters::WindowType;

/// Number of points in every derived array
pub const DEFAULT_NPTS: usize = 1024;

/// Longest filter the designer produces and the custom slot length
pub const DEFAULT_MAX_TAPS: usize = 6;

/// Immutable configuration for one engine instance
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Length of t, x, h, f, magnitude, phase and y
    pub npts: usize,

    /// Upper bound on the filter order and length of the custom coefficient slots
    pub max_taps: usize,

    /// Window applied by the FIR designer
    pub fir_window: WindowType,

    /// Seed for the noise waveform; `None` seeds from the thread RNG
    pub noise_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            npts: DEFAULT_NPTS,
            max_taps: DEFAULT_MAX_TAPS,
            fir_window: WindowType::Hamming,
            noise_seed: None,
        }
    }
}

impl EngineConfig {
    /// Config with a smaller point count, handy for tests
    pub fn with_npts(npts: usize) -> Self {
        Self {
            npts,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DspResult<()> {
        // The impulse stimulus needs index 1.
        if self.npts < 2 {
            return Err(DspError::InvalidConfig(format!(
                "npts must be at least 2, got {}",
                self.npts
            )));
        }
        if self.max_taps == 0 {
            return Err(DspError::InvalidConfig(
                "max_taps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
