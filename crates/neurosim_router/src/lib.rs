//! # NeuroSim Router
//!
//! Maps text tokens onto the seven fixed brain regions. Each token is
//! scored against small fixed lexicons (emotional valence, threat, social
//! relevance, semantic categories); per-region accumulation formulas turn a
//! token batch into activation strengths with latency estimates, and the
//! autism/PTSD overlays rescale the routing last.

pub mod lexicon;
pub mod router;

pub use router::{BrainRouter, RegionActivation, RoutingConfig, TokenAnalysis};
