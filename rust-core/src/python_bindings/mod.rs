//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod engine_bindings;

/// Python module definition
#[pymodule]
fn filter_explorer(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<engine_bindings::PyFilterEngine>()?;

    m.add("UNITS", crate::units::FrequencyUnit::ALL.map(|u| u.symbol()).to_vec())?;
    m.add("WAVEFORMS", crate::signal::Waveform::ALL.map(|w| w.name()).to_vec())?;
    m.add("FILTER_KINDS", crate::filters::FilterKind::ALL.map(|k| k.name()).to_vec())?;

    Ok(())
}
