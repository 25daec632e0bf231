//! # NeuroSim Core
//!
//! The microcircuit excitation/inhibition (E/I) dynamics engine. Every brain
//! region in the simulation owns one [`MicroCircuit`] and drives it once per
//! tick; the circuit integrates excitatory and inhibitory activity toward
//! activity-dependent targets, modulates neurotransmitter levels, injects
//! neural noise, and derives diagnostic signals (oscillation, pathology
//! flags) from its recent history.
//!
//! ## Dynamics
//!
//! All state evolves by discrete exponential relaxation:
//!
//! `x += (target - x) * dt / τ`
//!
//! with per-quantity time constants (excitation 10 ms, inhibition
//! 20 ms + delay, neurotransmitters 100 ms, adaptation 500 ms). Values are
//! hard-clamped after every update, so the engine never signals numeric
//! errors; misconfiguration degrades into bounded arithmetic instead.
//! A strict validation boundary is available for callers that prefer
//! rejection over clamping.
//!
//! ## Condition overlays
//!
//! Two named overlays scale the base dynamics multiplicatively and compose
//! in a fixed order (base → autism → PTSD):
//!
//! - **autism**: elevated E/I ratio, reduced inhibitory gain
//! - **ptsd**: delayed inhibition, hyperarousal, stochastic memory
//!   intrusion bursts

pub mod config;
pub mod microcircuit;
pub mod noise;
pub mod state;

pub use config::{CircuitConfig, CircuitError, ValidationMode};
pub use microcircuit::{
    MicroCircuit, ModulationKind, NeurotransmitterKind, PathologicalPattern,
};
pub use noise::NoiseSource;
pub use state::{ActivationState, NeurotransmitterState};
