//! Filter Explorer - DSP core
//!
//! Test-signal generation, low-pass filter design (windowed FIR and
//! Butterworth IIR) and response analysis behind a memoizing engine, with
//! optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod signal;
pub mod spectrum;
pub mod units;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use config::EngineConfig;
pub use engine::{DerivedSignals, FilterEngine, Node, Parameters, SharedEngine};
pub use error::{DspError, DspResult, ErrorCategory};
pub use filters::{FilterCoefficients, FilterKind, FilterSpec, WindowType};
pub use signal::{SignalSpec, Waveform};
pub use units::{Frequency, FrequencyUnit, RateMagnitude, SampleRateSpec};
