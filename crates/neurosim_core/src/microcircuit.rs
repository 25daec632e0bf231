//! The microcircuit state-update engine.
//!
//! One `process(input, dt)` call advances the circuit by a single tick,
//! in a fixed stage order (each stage reads state mutated by the previous
//! one):
//!
//! 1. advance the clock
//! 2. excitatory relaxation toward `(baseline + input × glutamate) × ei`
//! 3. inhibitory relaxation toward `excitation × gaba` (delayed)
//! 4. glutamate/GABA relaxation toward activity-coupled targets
//! 5. net activation and sigmoid firing rate
//! 6. adaptation (feeds back into next tick's excitation)
//! 7. Gaussian noise injection
//! 8. overlay post-processing (autism, then PTSD with intrusion bursts)
//! 9. oscillation detection over the recent history
//! 10. pathology flags
//! 11. history append (bounded ring buffers)
//!
//! The overlay multipliers in stage 8 apply on top of the per-stage
//! applications in stages 2/3; the legacy engine does the same and the
//! duplication is reproduced deliberately (see DESIGN.md).

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{CircuitConfig, CircuitError, ValidationMode};
use crate::noise::NoiseSource;
use crate::state::{
    clamp_activity, ActivationState, EXCITATION_MAX, INHIBITION_MAX, NEUROTRANSMITTER_MAX,
    NEUROTRANSMITTER_MIN,
};

/// Excitatory relaxation time constant (ms).
const TAU_EXCITATION_MS: f64 = 10.0;
/// Inhibitory base time constant (ms); the effective delay is added on top.
const TAU_INHIBITION_BASE_MS: f64 = 20.0;
/// Neurotransmitter relaxation time constant (ms).
const TAU_NEUROTRANSMITTER_MS: f64 = 100.0;
/// Adaptation relaxation time constant (ms).
const TAU_ADAPTATION_MS: f64 = 500.0;

/// Glutamate target coupling to excitatory activity.
const GLUTAMATE_COUPLING: f64 = 0.2;
/// GABA target coupling to inhibitory activity.
const GABA_COUPLING: f64 = 0.15;
/// Adaptation target as a fraction of firing rate.
const ADAPTATION_GAIN: f64 = 0.1;
/// Neuromodulatory side-entry gain applied to dopamine/norepinephrine.
const NEUROMODULATION_GAIN: f64 = 0.1;

/// Maximum simulated firing rate (Hz).
const MAX_FIRING_RATE_HZ: f64 = 200.0;
/// Flat excitatory burst added on a PTSD memory intrusion.
const INTRUSION_BURST: f64 = 1.0;

/// Cap on both history ring buffers.
pub const MAX_HISTORY_SAMPLES: usize = 1000;
/// Samples inspected for the oscillation flag.
const OSCILLATION_WINDOW: usize = 10;
/// Zero-crossing count above which the circuit is flagged oscillating.
const OSCILLATION_CROSSING_THRESHOLD: usize = 4;
/// Samples inspected for the frequency estimate.
const FREQUENCY_WINDOW: usize = 20;
/// The frequency estimate treats every history sample as spanning exactly
/// one millisecond, regardless of the dt actually passed to `process`.
/// Kept for parity with the legacy engine; a dt-aware estimate would
/// replace this constant with measured elapsed time.
const ASSUMED_SAMPLE_INTERVAL_MS: f64 = 1.0;
/// Consecutive hyperexcitable snapshots required for the seizure pattern.
const SEIZURE_WINDOW: usize = 50;

/// Kinds of external modulation accepted by [`MicroCircuit::apply_modulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModulationKind {
    Excitatory,
    Inhibitory,
    Neuromodulatory,
}

/// Neurotransmitters addressable through
/// [`MicroCircuit::release_neurotransmitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeurotransmitterKind {
    Glutamate,
    Gaba,
    Dopamine,
    Serotonin,
    Norepinephrine,
    Acetylcholine,
}

/// Named pathological conditions reported by
/// [`MicroCircuit::detect_pathological_patterns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathologicalPattern {
    Hyperexcitability,
    InhibitionFailure,
    SeizureActivity,
    MemoryIntrusion,
}

impl PathologicalPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hyperexcitability => "hyperexcitability",
            Self::InhibitionFailure => "inhibition_failure",
            Self::SeizureActivity => "seizure_activity",
            Self::MemoryIntrusion => "memory_intrusion",
        }
    }
}

impl fmt::Display for PathologicalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An externally applied perturbation active until `expires_at_ms`.
#[derive(Debug, Clone, Copy)]
struct PendingModulation {
    kind: ModulationKind,
    strength: f64,
    expires_at_ms: f64,
}

/// Simulated neural microcircuit with GABA/glutamate dynamics.
///
/// Single-threaded and synchronous: every call is an in-place state
/// transition with no suspension points. Instances are independent; wrap
/// one in external mutual exclusion before sharing it across threads.
#[derive(Debug, Clone)]
pub struct MicroCircuit {
    config: CircuitConfig,
    state: ActivationState,
    /// Full-snapshot history, parallel to the net-activation ring buffer.
    history: VecDeque<ActivationState>,
    pending_modulations: Vec<PendingModulation>,
    elapsed_ms: f64,
    /// Whether the PTSD intrusion burst fired during the current tick.
    intrusion_this_tick: bool,
    noise: NoiseSource,
}

impl MicroCircuit {
    /// Build a circuit with an entropy-seeded noise source.
    pub fn new(config: CircuitConfig) -> Self {
        Self::with_noise(config, NoiseSource::from_entropy())
    }

    /// Build a circuit with a deterministic noise sequence.
    pub fn with_seed(config: CircuitConfig, seed: u64) -> Self {
        Self::with_noise(config, NoiseSource::seeded(seed))
    }

    /// Strictly validated construction; rejects out-of-range parameters
    /// instead of absorbing them.
    pub fn try_new(config: CircuitConfig) -> Result<Self, CircuitError> {
        let config = config.validated(ValidationMode::Strict)?;
        Ok(Self::new(config))
    }

    fn with_noise(config: CircuitConfig, noise: NoiseSource) -> Self {
        let mut circuit = Self {
            state: ActivationState {
                excitatory_activity: config.baseline_excitation,
                inhibitory_activity: config.baseline_inhibition,
                ..ActivationState::default()
            },
            config,
            history: VecDeque::new(),
            pending_modulations: Vec::new(),
            elapsed_ms: 0.0,
            intrusion_this_tick: false,
            noise,
        };

        // Mode toggles permanently rebase the config; flags set on the
        // incoming config trigger them once at construction.
        if circuit.config.autism_mode {
            circuit.enable_autism_mode();
        }
        if circuit.config.ptsd_mode {
            circuit.enable_ptsd_mode();
        }

        circuit
    }

    /// Advance the circuit by one tick and return the updated snapshot.
    ///
    /// `dt` is the time step in milliseconds and must be positive; a
    /// non-positive `dt` is not rejected here (the arithmetic stays
    /// defined but degenerate). Use [`Self::try_process`] to get rejection
    /// instead.
    pub fn process(&mut self, input_strength: f64, dt: f64) -> &ActivationState {
        self.elapsed_ms += dt;
        self.prune_expired_modulations();

        self.update_excitatory(input_strength, dt);
        self.update_inhibitory(dt);
        self.update_neurotransmitters(dt);

        // Net activation is recomputed before any derived field.
        self.state.net_activation =
            self.state.excitatory_activity - self.state.inhibitory_activity;
        self.state.firing_rate = firing_rate(self.state.net_activation);

        self.apply_adaptation(dt);
        self.add_noise(dt);

        self.intrusion_this_tick = false;
        if self.config.autism_mode {
            self.apply_autism_overlay();
        }
        if self.config.ptsd_mode {
            self.apply_ptsd_overlay();
        }

        self.detect_oscillations();
        self.state.hyperexcitable = self.detect_hyperexcitability();
        self.state.inhibition_failure = self.detect_inhibition_failure();

        self.push_history();

        tracing::trace!(
            excitation = self.state.excitatory_activity,
            inhibition = self.state.inhibitory_activity,
            net = self.state.net_activation,
            "microcircuit tick"
        );

        &self.state
    }

    /// Like [`Self::process`], but rejects a non-positive or non-finite
    /// time step.
    pub fn try_process(
        &mut self,
        input_strength: f64,
        dt: f64,
    ) -> Result<&ActivationState, CircuitError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(CircuitError::InvalidTimeStep(dt));
        }
        Ok(self.process(input_strength, dt))
    }

    /// Apply an external modulation (e.g. from another brain region) that
    /// stays active for `duration_ms`. Excitatory/inhibitory modulations
    /// add to the respective drive targets each tick; neuromodulatory
    /// strength nudges dopamine and norepinephrine.
    pub fn apply_modulation(&mut self, kind: ModulationKind, strength: f64, duration_ms: f64) {
        self.pending_modulations.push(PendingModulation {
            kind,
            strength,
            expires_at_ms: self.elapsed_ms + duration_ms.max(0.0),
        });
    }

    /// Immediately release an amount of the named neurotransmitter,
    /// clamped into its operating range.
    pub fn release_neurotransmitter(&mut self, kind: NeurotransmitterKind, amount: f64) {
        let nt = &mut self.state.neurotransmitters;
        let level = match kind {
            NeurotransmitterKind::Glutamate => &mut nt.glutamate_level,
            NeurotransmitterKind::Gaba => &mut nt.gaba_level,
            NeurotransmitterKind::Dopamine => &mut nt.dopamine_level,
            NeurotransmitterKind::Serotonin => &mut nt.serotonin_level,
            NeurotransmitterKind::Norepinephrine => &mut nt.norepinephrine_level,
            NeurotransmitterKind::Acetylcholine => &mut nt.acetylcholine_level,
        };
        *level += amount;
        nt.normalize();
    }

    /// Current post-tick snapshot.
    pub fn current_state(&self) -> &ActivationState {
        &self.state
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// Replace the configuration wholesale. Mode flags on the new config
    /// are taken as-is; no re-baselining happens here.
    pub fn update_config(&mut self, config: CircuitConfig) {
        self.config = config;
    }

    /// Full-snapshot history, oldest first (capped at
    /// [`MAX_HISTORY_SAMPLES`]).
    pub fn activation_history(&self) -> &VecDeque<ActivationState> {
        &self.history
    }

    /// Elapsed simulated time (ms).
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Return all state to baseline defaults without touching the config.
    pub fn reset(&mut self) {
        self.state = ActivationState {
            excitatory_activity: self.config.baseline_excitation,
            inhibitory_activity: self.config.baseline_inhibition,
            ..ActivationState::default()
        };
        self.history.clear();
        self.pending_modulations.clear();
        self.elapsed_ms = 0.0;
        self.intrusion_this_tick = false;
    }

    /// Switch the circuit into the autism overlay.
    ///
    /// This permanently rebases the config: the E/I ratio is overwritten
    /// with the elevation value and the inhibitory baseline is scaled by
    /// the deficit. Repeated calls compound the baseline scaling.
    pub fn enable_autism_mode(&mut self) {
        self.config.autism_mode = true;
        self.config.ei_ratio = self.config.autism_ei_elevation;
        self.config.baseline_inhibition *= self.config.autism_inhibition_deficit;
    }

    /// Switch the circuit into the PTSD overlay.
    ///
    /// Overwrites the inhibition delay and scales the excitatory baseline
    /// by the hyperarousal factor; repeated calls compound the scaling.
    pub fn enable_ptsd_mode(&mut self) {
        self.config.ptsd_mode = true;
        self.config.inhibition_delay_ms = self.config.ptsd_inhibition_delay;
        self.config.baseline_excitation *= self.config.ptsd_hyperarousal;
    }

    /// Evaluate the named pathological conditions against current and
    /// recent state.
    pub fn detect_pathological_patterns(&self) -> Vec<PathologicalPattern> {
        let mut patterns = Vec::new();
        if self.detect_hyperexcitability() {
            patterns.push(PathologicalPattern::Hyperexcitability);
        }
        if self.detect_inhibition_failure() {
            patterns.push(PathologicalPattern::InhibitionFailure);
        }
        if self.detect_seizure_activity() {
            patterns.push(PathologicalPattern::SeizureActivity);
        }
        if self.intrusion_this_tick {
            patterns.push(PathologicalPattern::MemoryIntrusion);
        }
        patterns
    }

    // ------------------------------------------------------------------
    // Per-stage updates
    // ------------------------------------------------------------------

    fn update_excitatory(&mut self, input_strength: f64, dt: f64) {
        let drive = input_strength + self.modulation_drive(ModulationKind::Excitatory);
        let mut target = self.config.baseline_excitation
            + drive * self.state.neurotransmitters.glutamate_level;
        target *= self.config.ei_ratio;

        self.state.excitatory_activity +=
            (target - self.state.excitatory_activity) * dt / TAU_EXCITATION_MS;
        self.state.excitatory_activity =
            clamp_activity(self.state.excitatory_activity, EXCITATION_MAX);
    }

    fn update_inhibitory(&mut self, dt: f64) {
        // Inhibition tracks excitation, slower by the configured delay.
        let target = self.state.excitatory_activity * self.state.neurotransmitters.gaba_level
            + self.modulation_drive(ModulationKind::Inhibitory);

        let effective_delay = if self.config.ptsd_mode {
            self.config.ptsd_inhibition_delay
        } else {
            self.config.inhibition_delay_ms
        };
        let tau = TAU_INHIBITION_BASE_MS + effective_delay;

        self.state.inhibitory_activity += (target - self.state.inhibitory_activity) * dt / tau;

        if self.config.autism_mode {
            self.state.inhibitory_activity *= self.config.autism_inhibition_deficit;
        }

        self.state.inhibitory_activity =
            clamp_activity(self.state.inhibitory_activity, INHIBITION_MAX);
    }

    fn update_neurotransmitters(&mut self, dt: f64) {
        let neuromod = self.modulation_drive(ModulationKind::Neuromodulatory);
        let nt = &mut self.state.neurotransmitters;

        let target_glutamate = 1.0 + self.state.excitatory_activity * GLUTAMATE_COUPLING;
        nt.glutamate_level += (target_glutamate - nt.glutamate_level) * dt / TAU_NEUROTRANSMITTER_MS;

        let target_gaba = 1.0 + self.state.inhibitory_activity * GABA_COUPLING;
        nt.gaba_level += (target_gaba - nt.gaba_level) * dt / TAU_NEUROTRANSMITTER_MS;

        nt.glutamate_level = nt
            .glutamate_level
            .clamp(NEUROTRANSMITTER_MIN, NEUROTRANSMITTER_MAX);
        nt.gaba_level = nt
            .gaba_level
            .clamp(NEUROTRANSMITTER_MIN, NEUROTRANSMITTER_MAX);

        if neuromod != 0.0 {
            let delta = neuromod * NEUROMODULATION_GAIN * dt / TAU_NEUROTRANSMITTER_MS;
            nt.dopamine_level = (nt.dopamine_level + delta).clamp(0.0, 1.0);
            nt.norepinephrine_level = (nt.norepinephrine_level + delta).clamp(0.0, 1.0);
        }
    }

    fn apply_adaptation(&mut self, dt: f64) {
        // Applied after net/firing are computed: adaptation shapes next
        // tick's starting point, not this tick's reported values.
        let target = self.state.firing_rate * ADAPTATION_GAIN;
        self.state.adaptation_level +=
            (target - self.state.adaptation_level) * dt / TAU_ADAPTATION_MS;

        self.state.excitatory_activity *=
            1.0 - self.state.adaptation_level * self.config.adaptation_rate;
    }

    fn add_noise(&mut self, dt: f64) {
        let (e_noise, i_noise) = self.noise.activity_pair(self.config.noise_level, dt);
        self.state.excitatory_activity += e_noise;
        self.state.inhibitory_activity += i_noise;

        // Re-floored at zero only; the upper bound is not reapplied here.
        self.state.excitatory_activity = self.state.excitatory_activity.max(0.0);
        self.state.inhibitory_activity = self.state.inhibitory_activity.max(0.0);
    }

    fn apply_autism_overlay(&mut self) {
        self.state.excitatory_activity *= self.config.autism_ei_elevation;
        self.state.inhibitory_activity *= self.config.autism_inhibition_deficit;
    }

    fn apply_ptsd_overlay(&mut self) {
        self.state.excitatory_activity *= self.config.ptsd_hyperarousal;

        if self.noise.bernoulli(self.config.ptsd_memory_intrusion) {
            // Intrusive-memory activation: a sudden excitatory burst.
            self.state.excitatory_activity += INTRUSION_BURST;
            self.intrusion_this_tick = true;
            tracing::debug!("memory intrusion burst fired");
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    fn detect_oscillations(&mut self) {
        if self.state.activation_history.len() < OSCILLATION_WINDOW {
            self.state.in_oscillation = false;
            return;
        }

        let crossings = zero_crossings(&self.state.activation_history, OSCILLATION_WINDOW);
        self.state.in_oscillation = crossings > OSCILLATION_CROSSING_THRESHOLD;
        if self.state.in_oscillation {
            self.state.oscillation_frequency = self.estimate_oscillation_frequency();
        }
    }

    fn estimate_oscillation_frequency(&self) -> f64 {
        if self.state.activation_history.len() < FREQUENCY_WINDOW {
            return 0.0;
        }
        let crossings = zero_crossings(&self.state.activation_history, FREQUENCY_WINDOW) as f64;
        let window_ms = FREQUENCY_WINDOW as f64 * ASSUMED_SAMPLE_INTERVAL_MS;
        (crossings / 2.0) * (1000.0 / window_ms)
    }

    fn detect_hyperexcitability(&self) -> bool {
        self.state.excitatory_activity > 3.0
            || self.state.excitatory_activity / self.state.inhibitory_activity.max(0.1) > 3.0
    }

    fn detect_inhibition_failure(&self) -> bool {
        self.state.inhibitory_activity < 0.2 && self.state.excitatory_activity > 1.0
    }

    fn detect_seizure_activity(&self) -> bool {
        if self.history.len() < SEIZURE_WINDOW {
            return false;
        }
        self.history
            .iter()
            .rev()
            .take(SEIZURE_WINDOW)
            .all(|snapshot| snapshot.hyperexcitable)
    }

    // ------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------

    fn modulation_drive(&self, kind: ModulationKind) -> f64 {
        self.pending_modulations
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.strength)
            .sum()
    }

    fn prune_expired_modulations(&mut self) {
        let now = self.elapsed_ms;
        self.pending_modulations.retain(|m| m.expires_at_ms > now);
    }

    fn push_history(&mut self) {
        self.state
            .activation_history
            .push_back(self.state.net_activation);
        if self.state.activation_history.len() > MAX_HISTORY_SAMPLES {
            self.state.activation_history.pop_front();
        }

        self.history.push_back(self.state.clone());
        if self.history.len() > MAX_HISTORY_SAMPLES {
            self.history.pop_front();
        }
    }
}

/// Sigmoid activation mapped onto the firing-rate ceiling.
fn firing_rate(net_activation: f64) -> f64 {
    let sigmoid = 1.0 / (1.0 + (-net_activation).exp());
    sigmoid * MAX_FIRING_RATE_HZ
}

/// Count sign changes of `(sample - mean)` across consecutive pairs in the
/// last `window` samples.
fn zero_crossings(history: &VecDeque<f64>, window: usize) -> usize {
    let start = history.len() - window;
    let recent: Vec<f64> = history.iter().skip(start).copied().collect();
    let mean = recent.iter().sum::<f64>() / recent.len() as f64;

    recent
        .windows(2)
        .filter(|pair| (pair[0] - mean) * (pair[1] - mean) < 0.0)
        .count()
}
