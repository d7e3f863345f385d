//! Thread-safe handle around a [`FilterEngine`]

use super::{DerivedSignals, FilterEngine};
use crate::config::EngineConfig;
use crate::error::{DspError, DspResult};
use std::sync::{Arc, Mutex};

/// Cloneable handle; every clone drives the same engine
///
/// Each call locks for its whole duration, so a setter followed by a getter
/// on another thread sees either the old or the new parameters, never a mix.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<FilterEngine>>,
}

impl SharedEngine {
    pub fn new(config: EngineConfig) -> DspResult<Self> {
        Ok(Self::from_engine(FilterEngine::new(config)?))
    }

    pub fn from_engine(engine: FilterEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<T>(&self, f: impl FnOnce(&mut FilterEngine) -> DspResult<T>) -> DspResult<T> {
        let mut engine = self.inner.lock().map_err(|_| DspError::LockPoisoned)?;
        f(&mut engine)
    }

    pub fn derived(&self) -> DspResult<DerivedSignals> {
        self.with(|e| e.derived())
    }

    pub fn t(&self) -> DspResult<Vec<f64>> {
        self.with(|e| e.t().map(<[f64]>::to_vec))
    }

    pub fn x(&self) -> DspResult<Vec<f64>> {
        self.with(|e| e.x().map(<[f64]>::to_vec))
    }

    pub fn h(&self) -> DspResult<Vec<f64>> {
        self.with(|e| e.h().map(<[f64]>::to_vec))
    }

    pub fn f(&self) -> DspResult<Vec<f64>> {
        self.with(|e| e.f().map(<[f64]>::to_vec))
    }

    pub fn h_mag(&self) -> DspResult<Vec<f64>> {
        self.with(|e| e.h_mag().map(<[f64]>::to_vec))
    }

    pub fn h_phase(&self) -> DspResult<Vec<f64>> {
        self.with(|e| e.h_phase().map(<[f64]>::to_vec))
    }

    pub fn y(&self) -> DspResult<Vec<f64>> {
        self.with(|e| e.y().map(<[f64]>::to_vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Node;
    use crate::filters::FilterKind;
    use crate::units::FrequencyUnit;
    use std::thread;

    fn shared() -> SharedEngine {
        let config = EngineConfig {
            noise_seed: Some(3),
            ..EngineConfig::with_npts(128)
        };
        SharedEngine::new(config).unwrap()
    }

    #[test]
    fn test_clones_share_state() {
        let a = shared();
        let b = a.clone();

        a.with(|e| e.set_filter_spec(FilterKind::Iir, 4, 50, FrequencyUnit::KHz))
            .unwrap();
        let order = b.with(|e| Ok(e.parameters().filter.order)).unwrap();
        assert_eq!(order, 4);
    }

    #[test]
    fn test_concurrent_readers() {
        let engine = shared();
        let expected = engine.derived().unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                thread::spawn(move || engine.y().unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected.y);
        }
        // readers only hit the cache
        let count = engine.with(|e| Ok(e.recompute_count(Node::Output))).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_errors_pass_through() {
        let engine = shared();
        let err = engine
            .with(|e| e.set_filter_spec(FilterKind::Fir, 9, 50, FrequencyUnit::KHz))
            .unwrap_err();
        assert!(err.is_domain());
    }
}
