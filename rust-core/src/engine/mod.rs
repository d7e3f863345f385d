//! Engine facade: parameter setters, memoized derived signals
//!
//! Derived values are recomputed lazily on read, and only when an upstream
//! parameter changed since they were last computed (see [`graph`]).

pub mod graph;
pub mod shared;

pub use graph::{DependencyGraph, Node};
pub use shared::SharedEngine;

use crate::config::EngineConfig;
use crate::error::{DspError, DspResult};
use crate::filters::{
    apply, design, CoefficientDisplay, CustomCoefficients, FilterCoefficients, FilterKind,
    FilterSpec,
};
use crate::signal::{generate_waveform, time_base, SignalSpec, Waveform};
use crate::spectrum::{frequency_axis, frequency_response, impulse_response, magnitude, phase, FftEngine};
use crate::units::{Frequency, FrequencyUnit, RateMagnitude, SampleRateSpec};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// User-editable parameters other than the custom coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parameters {
    pub sample_rate: SampleRateSpec,
    pub signal: SignalSpec,
    pub filter: FilterSpec,
}

/// Snapshot of every derived array, all of length `npts`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedSignals {
    /// Sample instants (s)
    pub t: Vec<f64>,

    /// Input signal
    pub x: Vec<f64>,

    /// Impulse response
    pub h: Vec<f64>,

    /// Frequency axis (Hz)
    pub f: Vec<f64>,

    /// |H|, DC bin zeroed
    pub h_mag: Vec<f64>,

    /// ∠H in degrees
    pub h_phase: Vec<f64>,

    /// Filtered output
    pub y: Vec<f64>,
}

/// Last computed value of every derived node
struct DerivedCache {
    sample_rate: f64,
    t: Vec<f64>,
    f: Vec<f64>,
    x: Vec<f64>,
    coefficients: FilterCoefficients,
    display: CoefficientDisplay,
    h: Vec<f64>,
    transfer: Vec<Complex64>,
    h_mag: Vec<f64>,
    h_phase: Vec<f64>,
    y: Vec<f64>,
}

impl Default for DerivedCache {
    fn default() -> Self {
        Self {
            sample_rate: 0.0,
            t: Vec::new(),
            f: Vec::new(),
            x: Vec::new(),
            coefficients: FilterCoefficients::identity(),
            display: CoefficientDisplay::default(),
            h: Vec::new(),
            transfer: Vec::new(),
            h_mag: Vec::new(),
            h_phase: Vec::new(),
            y: Vec::new(),
        }
    }
}

/// Signal generation and filter analysis engine
///
/// Single-threaded; wrap it in a [`SharedEngine`] to use it from several
/// threads.
pub struct FilterEngine {
    config: EngineConfig,
    params: Parameters,
    custom: CustomCoefficients,
    graph: DependencyGraph,
    recomputations: [u64; Node::COUNT],
    fft: FftEngine,
    rng: StdRng,
    cache: DerivedCache,
}

impl FilterEngine {
    /// Create an engine with the default parameters
    ///
    /// The default order (3 taps) is clamped to `config.max_taps`.
    pub fn new(config: EngineConfig) -> DspResult<Self> {
        let mut params = Parameters::default();
        params.filter.order = params.filter.order.min(config.max_taps);
        Self::with_parameters(config, params)
    }

    /// Create an engine with explicit starting parameters
    pub fn with_parameters(config: EngineConfig, params: Parameters) -> DspResult<Self> {
        config.validate()?;
        check_order(params.filter.order, config.max_taps)?;

        let rng = match config.noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        tracing::debug!(
            npts = config.npts,
            max_taps = config.max_taps,
            "creating filter engine"
        );

        Ok(Self {
            fft: FftEngine::new(2 * config.npts),
            custom: CustomCoefficients::identity(config.max_taps),
            config,
            params,
            graph: DependencyGraph::new(),
            recomputations: [0; Node::COUNT],
            rng,
            cache: DerivedCache::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn custom_coefficients(&self) -> &CustomCoefficients {
        &self.custom
    }

    // ---- setters ----

    pub fn set_sample_rate(&mut self, value: RateMagnitude, unit: FrequencyUnit) {
        let spec = SampleRateSpec::new(value, unit);
        if spec != self.params.sample_rate {
            self.params.sample_rate = spec;
            self.invalidate(Node::RateSpec);
        }
    }

    /// # Errors
    /// Domain error if `freq` or `span` is outside [1, 1000].
    pub fn set_signal_spec(
        &mut self,
        waveform: Waveform,
        freq: u32,
        freq_unit: FrequencyUnit,
        span: u32,
        span_unit: FrequencyUnit,
    ) -> DspResult<()> {
        let spec = SignalSpec::new(
            waveform,
            Frequency::new(freq, freq_unit)?,
            Frequency::new(span, span_unit)?,
        );
        self.set_signal(spec);
        Ok(())
    }

    pub fn set_signal(&mut self, spec: SignalSpec) {
        if spec != self.params.signal {
            self.params.signal = spec;
            self.invalidate(Node::SignalSpec);
        }
    }

    /// # Errors
    /// Domain error for an order outside [1, max_taps] or a cutoff outside
    /// [1, 1000]. Nothing changes on error.
    pub fn set_filter_spec(
        &mut self,
        kind: FilterKind,
        order: usize,
        cutoff: u32,
        cutoff_unit: FrequencyUnit,
    ) -> DspResult<()> {
        let cutoff = Frequency::new(cutoff, cutoff_unit)?;
        self.set_filter(FilterSpec::new(kind, order, cutoff))
    }

    pub fn set_filter(&mut self, spec: FilterSpec) -> DspResult<()> {
        check_order(spec.order, self.config.max_taps)?;

        let current = self.params.filter;
        self.params.filter = spec;
        if spec.kind != current.kind {
            self.invalidate(Node::Kind);
        }
        if spec.order != current.order {
            self.invalidate(Node::Order);
        }
        if spec.cutoff != current.cutoff {
            self.invalidate(Node::Cutoff);
        }
        Ok(())
    }

    /// Store user coefficients for [`FilterKind::Custom`]
    ///
    /// # Errors
    /// Configuration error unless both vectors have `max_taps` entries, all
    /// finite, with `a[0] != 0`.
    pub fn set_custom_coefficients(&mut self, a: Vec<f64>, b: Vec<f64>) -> DspResult<()> {
        let custom = CustomCoefficients::new(a, b, self.config.max_taps)?;
        if custom != self.custom {
            self.custom = custom;
            self.invalidate(Node::Custom);
        }
        Ok(())
    }

    /// Copy the current design, zero-padded to `max_taps`, into the custom slots
    ///
    /// Meant to be called right before switching to [`FilterKind::Custom`];
    /// the engine does not enforce that ordering.
    pub fn copy_coefficients_to_custom(&mut self) -> DspResult<()> {
        let max_taps = self.config.max_taps;
        let (a, b) = self.coefficients()?.padded(max_taps);
        self.set_custom_coefficients(a, b)
    }

    // ---- getters ----

    pub fn sample_rate(&mut self) -> DspResult<f64> {
        self.ensure(Node::SampleRate)?;
        Ok(self.cache.sample_rate)
    }

    pub fn t(&mut self) -> DspResult<&[f64]> {
        self.ensure(Node::Time)?;
        Ok(&self.cache.t)
    }

    pub fn x(&mut self) -> DspResult<&[f64]> {
        self.ensure(Node::Input)?;
        Ok(&self.cache.x)
    }

    pub fn h(&mut self) -> DspResult<&[f64]> {
        self.ensure(Node::Impulse)?;
        Ok(&self.cache.h)
    }

    pub fn f(&mut self) -> DspResult<&[f64]> {
        self.ensure(Node::FrequencyAxis)?;
        Ok(&self.cache.f)
    }

    /// Complex frequency response H
    pub fn transfer(&mut self) -> DspResult<&[Complex64]> {
        self.ensure(Node::Transfer)?;
        Ok(&self.cache.transfer)
    }

    pub fn h_mag(&mut self) -> DspResult<&[f64]> {
        self.ensure(Node::Magnitude)?;
        Ok(&self.cache.h_mag)
    }

    pub fn h_phase(&mut self) -> DspResult<&[f64]> {
        self.ensure(Node::Phase)?;
        Ok(&self.cache.h_phase)
    }

    pub fn y(&mut self) -> DspResult<&[f64]> {
        self.ensure(Node::Output)?;
        Ok(&self.cache.y)
    }

    pub fn coefficients(&mut self) -> DspResult<&FilterCoefficients> {
        self.ensure(Node::Coefficients)?;
        Ok(&self.cache.coefficients)
    }

    /// Display strings of the last designed (non-custom) filter
    pub fn coefficient_display(&mut self) -> DspResult<&CoefficientDisplay> {
        self.ensure(Node::Coefficients)?;
        Ok(&self.cache.display)
    }

    /// Bring every derived value up to date and copy it out
    pub fn derived(&mut self) -> DspResult<DerivedSignals> {
        for node in Node::ALL {
            self.ensure(node)?;
        }
        Ok(self.snapshot())
    }

    /// Copy of the cache as it stands, without recomputing
    ///
    /// After a failed recomputation this still holds the last valid values.
    pub fn snapshot(&self) -> DerivedSignals {
        DerivedSignals {
            t: self.cache.t.clone(),
            x: self.cache.x.clone(),
            h: self.cache.h.clone(),
            f: self.cache.f.clone(),
            h_mag: self.cache.h_mag.clone(),
            h_phase: self.cache.h_phase.clone(),
            y: self.cache.y.clone(),
        }
    }

    /// How many times `node` has been recomputed
    pub fn recompute_count(&self, node: Node) -> u64 {
        self.recomputations[node.index()]
    }

    pub fn is_stale(&self, node: Node) -> bool {
        self.graph.is_stale(node)
    }

    // ---- evaluation ----

    fn invalidate(&mut self, changed: Node) {
        let reached = self.graph.invalidate(changed);
        tracing::debug!(?changed, ?reached, "parameter changed");
    }

    fn ensure(&mut self, node: Node) -> DspResult<()> {
        if !self.graph.is_stale(node) {
            return Ok(());
        }
        for &dep in node.dependencies() {
            self.ensure(dep)?;
        }

        if let Err(err) = self.recompute(node) {
            tracing::warn!(?node, %err, "recomputation failed, keeping previous value");
            return Err(err);
        }
        self.graph.mark_fresh(node);
        self.recomputations[node.index()] += 1;
        tracing::debug!(?node, count = self.recomputations[node.index()], "recomputed");
        Ok(())
    }

    /// Recompute one node from its (fresh) dependencies
    ///
    /// Results are written to the cache only on success.
    fn recompute(&mut self, node: Node) -> DspResult<()> {
        let npts = self.config.npts;
        let cache = &mut self.cache;

        match node {
            Node::RateSpec
            | Node::SignalSpec
            | Node::Order
            | Node::Kind
            | Node::Cutoff
            | Node::Custom => {}
            Node::SampleRate => cache.sample_rate = self.params.sample_rate.hz(),
            Node::Time => cache.t = time_base(cache.sample_rate, npts),
            Node::FrequencyAxis => cache.f = frequency_axis(cache.sample_rate, npts),
            Node::Input => {
                cache.x = generate_waveform(&cache.t, &self.params.signal, &mut self.rng)?;
            }
            Node::Coefficients => {
                let spec = &self.params.filter;
                let coeffs = design(
                    spec.kind,
                    spec.order,
                    spec.cutoff.hz(),
                    cache.sample_rate,
                    &self.custom,
                    self.config.max_taps,
                    self.config.fir_window,
                )?;
                if spec.kind != FilterKind::Custom {
                    cache.display = CoefficientDisplay::from_coefficients(&coeffs);
                }
                cache.coefficients = coeffs;
            }
            Node::Impulse => cache.h = impulse_response(&cache.coefficients, npts),
            Node::Transfer => {
                cache.transfer = frequency_response(&cache.coefficients, &mut self.fft)?;
            }
            Node::Magnitude => cache.h_mag = magnitude(&cache.transfer),
            Node::Phase => cache.h_phase = phase(&cache.transfer),
            Node::Output => cache.y = apply(&cache.coefficients, &cache.x),
        }
        Ok(())
    }
}

fn check_order(order: usize, max_taps: usize) -> DspResult<()> {
    if order == 0 || order > max_taps {
        return Err(DspError::InvalidOrder {
            order,
            max: max_taps,
        });
    }
    Ok(())
}
