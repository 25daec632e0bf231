//! # NeuroSim Senses
//!
//! Multi-modal sensory integration. [`MultiModalFusion`] combines visual,
//! auditory, vestibular, and interoceptive embeddings into one unified
//! representation per tick, with overload/conflict/gating metrics and the
//! autism/PTSD sensory overlays. The `synth` module provides synthetic
//! embedding generators for driving the simulation without real signal
//! processing.

pub mod fusion;
pub mod synth;

pub use fusion::{
    AutismMetrics, FusedRepresentation, FusionConfig, FusionMetadata, MultiModalFusion,
    PtsdMetrics, SensoryInput, DEFAULT_EMBEDDING_DIM, MODALITY_NAMES,
};
pub use synth::{
    AudioEmbedding, AudioSynth, InteroceptiveEmbedding, InteroceptiveSynth, VestibularEmbedding,
    VestibularSynth, VisionSynth, VisualEmbedding,
};
