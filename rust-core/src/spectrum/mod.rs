//! Frequency-domain analysis of designed filters

pub mod fft;
pub mod response;

pub use fft::FftEngine;
pub use response::{frequency_axis, frequency_response, impulse_response, magnitude, phase, transfer_at};
