//! Stimulus generation

pub mod generator;

pub use generator::{generate, generate_waveform, time_base, unit_impulse, SignalSpec, Waveform};
