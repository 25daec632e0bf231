//! # NeuroSim Regions
//!
//! Brain region wrappers over the microcircuit E/I engine. Every region
//! owns one [`neurosim_core::MicroCircuit`], forwards a scalar drive to it
//! each tick, and reports a normalized activation upward.
//!
//! [`Amygdala`] carries real region-specific state (threat appraisal,
//! habituation/sensitization, trauma templates); the remaining regions are
//! thin gain multipliers over the shared [`CircuitRegion`] base, exactly as
//! the system ships them.

pub mod amygdala;
pub mod region;
pub mod stubs;

pub use amygdala::{Amygdala, AmygdalaConfig, AmygdalaState};
pub use region::{cosine_similarity, BrainRegion, CircuitRegion, RegionConfig};
pub use stubs::{Cerebellum, Hippocampus, Insula, Prefrontal};
