//! Error types for signal generation, filter design and the engine facade

use thiserror::Error;

/// Broad classification of a [`DspError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid numeric input (ranges, ratios, degenerate waveforms, unknown symbols)
    Domain,

    /// Malformed user-supplied coefficients or engine configuration
    Configuration,

    /// Failures that valid input should never produce
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("{name} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Filter order must be in [1, {max}], got {order}")]
    InvalidOrder { order: usize, max: usize },

    #[error("Normalized cutoff must lie strictly between 0 and 1, got {0}")]
    CutoffRatio(f64),

    #[error("Triangle wave is undefined when the underlying square wave is constant")]
    DegenerateTriangle,

    #[error("Unknown {kind} '{value}'")]
    UnknownSymbol { kind: &'static str, value: String },

    #[error("Coefficient vector {name} must have {expected} entries, got {got}")]
    CoefficientLength {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Leading feedback coefficient a[0] must be non-zero")]
    ZeroLeadingCoefficient,

    #[error("Coefficient {name}[{index}] is not finite")]
    NonFiniteCoefficient { name: &'static str, index: usize },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("FFT processing failed: {0}")]
    Fft(String),

    #[error("Engine lock poisoned by a panicking thread")]
    LockPoisoned,
}

impl DspError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            DspError::OutOfRange { .. }
            | DspError::InvalidOrder { .. }
            | DspError::CutoffRatio(_)
            | DspError::DegenerateTriangle
            | DspError::UnknownSymbol { .. } => ErrorCategory::Domain,

            DspError::CoefficientLength { .. }
            | DspError::ZeroLeadingCoefficient
            | DspError::NonFiniteCoefficient { .. }
            | DspError::InvalidConfig(_) => ErrorCategory::Configuration,

            DspError::Fft(_) | DspError::LockPoisoned => ErrorCategory::Internal,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.category() == ErrorCategory::Domain
    }

    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(DspError::CutoffRatio(1.5).is_domain());
        assert!(DspError::DegenerateTriangle.is_domain());
        assert!(DspError::ZeroLeadingCoefficient.is_configuration());
        assert!(DspError::InvalidConfig("npts".into()).is_configuration());
        assert_eq!(DspError::LockPoisoned.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_messages() {
        let err = DspError::InvalidOrder { order: 7, max: 6 };
        assert_eq!(err.to_string(), "Filter order must be in [1, 6], got 7");

        let err = DspError::UnknownSymbol {
            kind: "unit",
            value: "THz".into(),
        };
        assert_eq!(err.to_string(), "Unknown unit 'THz'");
    }
}
