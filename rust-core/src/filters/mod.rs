//! Filter design and linear filtering

pub mod windows;
pub mod design;
pub mod lfilter;

pub use windows::{WindowType, generate_window};
pub use design::{
    CoefficientDisplay, CustomCoefficients, FilterCoefficients, FilterKind, FilterSpec,
    design, design_butterworth_lowpass, design_lowpass_fir, format_coefficients,
    normalized_cutoff,
};
pub use lfilter::{LinearFilter, apply};
