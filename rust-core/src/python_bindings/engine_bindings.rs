//! Python bindings for the filter engine

use crate::config::EngineConfig;
use crate::engine::SharedEngine;
use crate::error::DspError;
use crate::filters::{FilterKind, WindowType};
use crate::signal::Waveform;
use crate::units::{FrequencyUnit, RateMagnitude};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

impl From<DspError> for PyErr {
    fn from(err: DspError) -> PyErr {
        if err.is_domain() || err.is_configuration() {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}

fn parse_window(name: &str) -> PyResult<WindowType> {
    match name {
        "hamming" => Ok(WindowType::Hamming),
        "hann" => Ok(WindowType::Hann),
        "blackman" => Ok(WindowType::Blackman),
        "rectangular" => Ok(WindowType::Rectangular),
        other => Err(PyValueError::new_err(format!("Unknown window '{}'", other))),
    }
}

fn to_vec(array: PyReadonlyArray1<f64>) -> PyResult<Vec<f64>> {
    array
        .as_slice()
        .map(<[f64]>::to_vec)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Filter engine exposed to Python
///
/// Units, waveforms and filter kinds are passed as the strings shown in the
/// UI: "Hz", "kHz", "MHz", "GHz"; "sine", "square", ...; "FIR", "IIR",
/// "custom".
#[pyclass(name = "FilterEngine")]
pub struct PyFilterEngine {
    engine: SharedEngine,
}

#[pymethods]
impl PyFilterEngine {
    /// Create a new engine
    ///
    /// Args:
    ///     npts: Length of every derived array
    ///     max_taps: Largest filter order and custom coefficient count
    ///     window: FIR design window
    ///     seed: Noise seed, random if None
    #[new]
    #[pyo3(signature = (npts=1024, max_taps=6, window="hamming", seed=None))]
    fn new(npts: usize, max_taps: usize, window: &str, seed: Option<u64>) -> PyResult<Self> {
        let config = EngineConfig {
            npts,
            max_taps,
            fir_window: parse_window(window)?,
            noise_seed: seed,
        };
        Ok(Self {
            engine: SharedEngine::new(config)?,
        })
    }

    /// Length of every derived array
    #[getter]
    fn npts(&self) -> PyResult<usize> {
        Ok(self.engine.with(|e| Ok(e.config().npts))?)
    }

    /// Number of custom coefficient slots, also the largest order
    #[getter]
    fn max_taps(&self) -> PyResult<usize> {
        Ok(self.engine.with(|e| Ok(e.config().max_taps))?)
    }

    /// Set the sample rate, e.g. (1, "MHz")
    fn set_sample_rate(&self, value: u32, unit: &str) -> PyResult<()> {
        let value = RateMagnitude::try_from(value)?;
        let unit: FrequencyUnit = unit.parse()?;
        self.engine.with(|e| {
            e.set_sample_rate(value, unit);
            Ok(())
        })?;
        Ok(())
    }

    /// Set the input waveform, its frequency and the chirp span
    fn set_signal(
        &self,
        waveform: &str,
        freq: u32,
        freq_unit: &str,
        span: u32,
        span_unit: &str,
    ) -> PyResult<()> {
        let waveform: Waveform = waveform.parse()?;
        let freq_unit: FrequencyUnit = freq_unit.parse()?;
        let span_unit: FrequencyUnit = span_unit.parse()?;
        self.engine
            .with(|e| e.set_signal_spec(waveform, freq, freq_unit, span, span_unit))?;
        Ok(())
    }

    /// Set filter kind, number of taps and cutoff
    fn set_filter(&self, kind: &str, order: usize, cutoff: u32, cutoff_unit: &str) -> PyResult<()> {
        let kind: FilterKind = kind.parse()?;
        let cutoff_unit: FrequencyUnit = cutoff_unit.parse()?;
        self.engine
            .with(|e| e.set_filter_spec(kind, order, cutoff, cutoff_unit))?;
        Ok(())
    }

    /// Set the coefficients used by the "custom" filter kind
    fn set_custom_coefficients(
        &self,
        a: PyReadonlyArray1<f64>,
        b: PyReadonlyArray1<f64>,
    ) -> PyResult<()> {
        let a = to_vec(a)?;
        let b = to_vec(b)?;
        self.engine.with(|e| e.set_custom_coefficients(a, b))?;
        Ok(())
    }

    /// Copy the designed coefficients into the custom slots
    fn copy_to_custom(&self) -> PyResult<()> {
        self.engine.with(|e| e.copy_coefficients_to_custom())?;
        Ok(())
    }

    /// Designed coefficients as (a, b) display strings
    fn coefficient_strings(&self) -> PyResult<(String, String)> {
        let display = self
            .engine
            .with(|e| e.coefficient_display().map(|d| (d.a.clone(), d.b.clone())))?;
        Ok(display)
    }

    /// Sample rate in Hz
    fn sample_rate(&self) -> PyResult<f64> {
        Ok(self.engine.with(|e| e.sample_rate())?)
    }

    fn t<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.engine.t()?))
    }

    fn x<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.engine.x()?))
    }

    fn h<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.engine.h()?))
    }

    fn f<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.engine.f()?))
    }

    fn h_mag<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.engine.h_mag()?))
    }

    fn h_phase<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.engine.h_phase()?))
    }

    fn y<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        Ok(PyArray1::from_vec(py, self.engine.y()?))
    }

    /// All derived arrays at once
    ///
    /// Returns:
    ///     Dictionary with keys 't', 'x', 'h', 'f', 'Hmag', 'Hphase', 'y'
    fn derived(&self, py: Python<'_>) -> PyResult<PyObject> {
        let d = self.engine.derived()?;
        let dict = pyo3::types::PyDict::new(py);

        dict.set_item("t", PyArray1::from_vec(py, d.t))?;
        dict.set_item("x", PyArray1::from_vec(py, d.x))?;
        dict.set_item("h", PyArray1::from_vec(py, d.h))?;
        dict.set_item("f", PyArray1::from_vec(py, d.f))?;
        dict.set_item("Hmag", PyArray1::from_vec(py, d.h_mag))?;
        dict.set_item("Hphase", PyArray1::from_vec(py, d.h_phase))?;
        dict.set_item("y", PyArray1::from_vec(py, d.y))?;

        Ok(dict.into())
    }
}
