//! Per-tick circuit state: activity levels, neurotransmitters, and the
//! bounded net-activation history the diagnostics read from.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Glutamate/GABA operating range.
pub const NEUROTRANSMITTER_MIN: f64 = 0.1;
pub const NEUROTRANSMITTER_MAX: f64 = 2.0;

/// Excitatory activity ceiling.
pub const EXCITATION_MAX: f64 = 5.0;
/// Inhibitory activity ceiling.
pub const INHIBITION_MAX: f64 = 3.0;

/// Guard against NaN/Inf leaking into state. Non-finite values are replaced
/// with the supplied fallback.
#[inline]
pub(crate) fn sanitize(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("non-finite value in circuit state, resetting to {}", fallback);
        fallback
    }
}

/// Clamp an activity level into [0, max], sanitizing non-finite input.
#[inline]
pub(crate) fn clamp_activity(v: f64, max: f64) -> f64 {
    sanitize(v, 0.0).clamp(0.0, max)
}

/// Six independent neurotransmitter levels.
///
/// Only glutamate and GABA are coupled to the E/I loop; the four
/// neuromodulators move only through external release or modulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeurotransmitterState {
    /// Excitatory neurotransmitter level
    pub glutamate_level: f64,
    /// Inhibitory neurotransmitter level
    pub gaba_level: f64,
    /// Reward/motivation modulation
    pub dopamine_level: f64,
    /// Mood/anxiety modulation
    pub serotonin_level: f64,
    /// Arousal/attention modulation
    pub norepinephrine_level: f64,
    /// Attention/learning modulation
    pub acetylcholine_level: f64,
}

impl Default for NeurotransmitterState {
    fn default() -> Self {
        Self {
            glutamate_level: 1.0,
            gaba_level: 1.0,
            dopamine_level: 0.5,
            serotonin_level: 0.5,
            norepinephrine_level: 0.5,
            acetylcholine_level: 0.5,
        }
    }
}

impl NeurotransmitterState {
    /// Clamp glutamate/GABA to their operating range and the modulators
    /// to [0, 1].
    pub fn normalize(&mut self) {
        self.glutamate_level =
            sanitize(self.glutamate_level, 1.0).clamp(NEUROTRANSMITTER_MIN, NEUROTRANSMITTER_MAX);
        self.gaba_level =
            sanitize(self.gaba_level, 1.0).clamp(NEUROTRANSMITTER_MIN, NEUROTRANSMITTER_MAX);
        self.dopamine_level = sanitize(self.dopamine_level, 0.5).clamp(0.0, 1.0);
        self.serotonin_level = sanitize(self.serotonin_level, 0.5).clamp(0.0, 1.0);
        self.norepinephrine_level = sanitize(self.norepinephrine_level, 0.5).clamp(0.0, 1.0);
        self.acetylcholine_level = sanitize(self.acetylcholine_level, 0.5).clamp(0.0, 1.0);
    }
}

/// Full per-tick output snapshot of a microcircuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationState {
    /// Current excitatory activity, clamped to [0, 5] by the update loop
    pub excitatory_activity: f64,
    /// Current inhibitory activity, clamped to [0, 3] by the update loop
    pub inhibitory_activity: f64,
    /// Net circuit activation (excitatory − inhibitory)
    pub net_activation: f64,
    /// Simulated firing rate (Hz)
    pub firing_rate: f64,

    /// Whether the circuit is oscillating
    pub in_oscillation: bool,
    /// Estimated oscillation frequency (Hz)
    pub oscillation_frequency: f64,
    /// Hyperexcitability flag
    pub hyperexcitable: bool,
    /// Inhibitory control failure flag
    pub inhibition_failure: bool,

    pub neurotransmitters: NeurotransmitterState,

    /// Rolling net-activation history (ring buffer, capped)
    pub activation_history: VecDeque<f64>,
    /// Current adaptation state
    pub adaptation_level: f64,
    /// Neural fatigue level. Declared for data-shape parity with the
    /// legacy engine; nothing updates it.
    pub fatigue_level: f64,
}

impl Default for ActivationState {
    fn default() -> Self {
        Self {
            excitatory_activity: 0.0,
            inhibitory_activity: 0.0,
            net_activation: 0.0,
            firing_rate: 0.0,
            in_oscillation: false,
            oscillation_frequency: 0.0,
            hyperexcitable: false,
            inhibition_failure: false,
            neurotransmitters: NeurotransmitterState::default(),
            activation_history: VecDeque::new(),
            adaptation_level: 0.0,
            fatigue_level: 0.0,
        }
    }
}
