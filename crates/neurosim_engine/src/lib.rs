//! # NeuroSim Engine
//!
//! The orchestrator tying the simulation layers together. A
//! [`NeuroSimulator`] owns the token router, the sensory fusion layer, the
//! flashback overlay, and the seven brain regions (each driving its own
//! microcircuit); every `process` call runs one full cycle and yields a
//! [`SimulationState`] that the report layer serializes with fixed JSON
//! keys.

pub mod flashback;
pub mod report;
pub mod simulator;

pub use flashback::{FlashbackConfig, FlashbackOverlay, FlashbackState, TraumaTemplate};
pub use report::{ActivationReport, ReportError};
pub use simulator::{
    MicrocircuitSummary, MultiModalInput, MultimodalContext, NeuroSimulator, SimulationState,
    SimulatorConfig,
};
