//! The region trait and the shared circuit-owning base.

use neurosim_core::{ActivationState, CircuitConfig, MicroCircuit};
use serde::{Deserialize, Serialize};

/// Per-region configuration wrapping the circuit parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub region_name: String,
    pub circuit_config: CircuitConfig,
    /// Resting activation reported before the first tick
    pub baseline_activation: f64,
    /// Activation level above which the region counts as engaged
    pub activation_threshold: f64,
    /// Ceiling on the reported activation
    pub max_activation: f64,
    /// Names of regions this one projects to
    pub connected_regions: Vec<String>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            region_name: String::new(),
            circuit_config: CircuitConfig::default(),
            baseline_activation: 0.1,
            activation_threshold: 0.5,
            max_activation: 1.0,
            connected_regions: Vec::new(),
        }
    }
}

impl RegionConfig {
    /// Convenience constructor for a named region over a circuit config.
    pub fn named(region_name: impl Into<String>, circuit_config: CircuitConfig) -> Self {
        Self {
            region_name: region_name.into(),
            circuit_config,
            ..Self::default()
        }
    }
}

/// A simulated brain region driving one microcircuit per tick.
pub trait BrainRegion {
    /// Region identifier (matches the router's region names).
    fn name(&self) -> &str;

    /// Drive the region with a scalar input for one `dt`-millisecond tick
    /// and return the updated activation level.
    fn process_input(&mut self, input: f64, dt: f64) -> f64;

    /// Activation reported after the most recent tick.
    fn activation(&self) -> f64;

    /// Post-tick snapshot of the owned microcircuit.
    fn microcircuit_state(&self) -> &ActivationState;
}

/// Base region: owns a microcircuit, forwards the scalar input, reports the
/// clamped net activation. Specialized regions wrap this and layer their own
/// appraisal on top.
#[derive(Debug, Clone)]
pub struct CircuitRegion {
    config: RegionConfig,
    circuit: MicroCircuit,
    activation: f64,
    elapsed_ms: f64,
}

impl CircuitRegion {
    pub fn new(config: RegionConfig) -> Self {
        let circuit = MicroCircuit::new(config.circuit_config.clone());
        Self {
            activation: config.baseline_activation,
            config,
            circuit,
            elapsed_ms: 0.0,
        }
    }

    /// Deterministic construction for reproducible runs.
    pub fn with_seed(config: RegionConfig, seed: u64) -> Self {
        let circuit = MicroCircuit::with_seed(config.circuit_config.clone(), seed);
        Self {
            activation: config.baseline_activation,
            config,
            circuit,
            elapsed_ms: 0.0,
        }
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    pub fn circuit(&self) -> &MicroCircuit {
        &self.circuit
    }

    /// Advance the owned circuit by one tick without touching the reported
    /// activation. Specialized regions call this first, then set their own
    /// activation.
    pub(crate) fn drive(&mut self, input: f64, dt: f64) -> &ActivationState {
        self.elapsed_ms += dt;
        self.circuit.process(input, dt)
    }

    pub(crate) fn set_activation(&mut self, activation: f64) {
        self.activation = activation;
    }

    /// Return the region and its circuit to baseline.
    pub fn reset(&mut self) {
        self.circuit.reset();
        self.activation = self.config.baseline_activation;
        self.elapsed_ms = 0.0;
    }
}

impl BrainRegion for CircuitRegion {
    fn name(&self) -> &str {
        &self.config.region_name
    }

    fn process_input(&mut self, input: f64, dt: f64) -> f64 {
        let state = self.drive(input, dt);
        let net = state.net_activation;
        self.activation = net.clamp(0.0, self.config.max_activation);
        tracing::trace!(
            region = %self.config.region_name,
            activation = self.activation,
            "region tick"
        );
        self.activation
    }

    fn activation(&self) -> f64 {
        self.activation
    }

    fn microcircuit_state(&self) -> &ActivationState {
        self.circuit.current_state()
    }
}

/// Cosine similarity floored at zero. Mismatched dimensions and zero-norm
/// vectors score 0 rather than erroring.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).max(0.0)
}
