//! The simulation orchestrator.
//!
//! One `process` call runs the full cycle: sensory fusion → token routing
//! → per-region microcircuit drive → flashback trigger check → aggregate
//! E/I summary → multimodal context labels → canned response → memory
//! trace. Region names are fixed and shared with the router.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use neurosim_core::CircuitConfig;
use neurosim_regions::{
    Amygdala, AmygdalaConfig, BrainRegion, Cerebellum, CircuitRegion, Hippocampus, Insula,
    Prefrontal, RegionConfig,
};
use neurosim_router::{BrainRouter, RoutingConfig};
use neurosim_senses::{FusedRepresentation, FusionConfig, MultiModalFusion, SensoryInput};

use crate::flashback::{FlashbackConfig, FlashbackOverlay};

/// Cap on stored memory traces.
const MAX_MEMORY_TRACES: usize = 1000;

/// E/I ratio above which the aggregate state counts as looping.
const LOOPING_RATIO: f64 = 2.0;

/// Text-only processing pads these embedding dimensions with zeros.
const TEXT_ONLY_DIMS: [usize; 4] = [512, 256, 128, 64];

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Enable autism-specific neural patterns
    pub autism_mode: bool,
    /// Enable the PTSD flashback overlay
    pub ptsd_overlay: bool,
    /// E/I ratio applied to every region circuit
    pub excitation_ratio: f64,
    /// Inhibition delay (ms) applied to every region circuit
    pub inhibition_delay: f64,
    /// Threshold for memory formation
    pub memory_threshold: f64,
    /// Sensitivity to trauma triggers
    pub flashback_sensitivity: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            autism_mode: false,
            ptsd_overlay: false,
            excitation_ratio: 1.0,
            inhibition_delay: 0.0,
            memory_threshold: 0.7,
            flashback_sensitivity: 0.5,
        }
    }
}

/// Multi-modal input for one simulation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiModalInput {
    pub visual_embedding: Vec<f64>,
    pub audio_embedding: Vec<f64>,
    pub vestibular_embedding: Vec<f64>,
    pub interoceptive_embedding: Vec<f64>,
    /// Whitespace-separated input tokens
    pub text_tokens: String,
    pub timestamp: f64,
}

/// Aggregate E/I summary across all region circuits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicrocircuitSummary {
    pub excitation: f64,
    pub inhibition: f64,
    pub looping: bool,
}

impl Default for MicrocircuitSummary {
    fn default() -> Self {
        Self {
            excitation: 1.0,
            inhibition: 1.0,
            looping: false,
        }
    }
}

/// Multi-modal context labels derived from the fused representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimodalContext {
    pub audio_pitch: String,
    pub image_tag: String,
    pub body_state: String,
    pub heartbeat: String,
}

impl Default for MultimodalContext {
    fn default() -> Self {
        Self {
            audio_pitch: "normal".to_string(),
            image_tag: "none".to_string(),
            body_state: "neutral".to_string(),
            heartbeat: "normal".to_string(),
        }
    }
}

/// Output snapshot of one processing cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub response_text: String,
    pub region_activations: BTreeMap<String, f64>,
    pub microcircuit_state: MicrocircuitSummary,
    pub multimodal_context: MultimodalContext,
    pub timestamp: f64,
    pub flashback_triggered: bool,
    /// Currently active memory traces
    pub active_memories: Vec<String>,
}

/// The simulation engine.
pub struct NeuroSimulator {
    config: SimulatorConfig,
    router: BrainRouter,
    fusion: MultiModalFusion,
    flashback: FlashbackOverlay,
    amygdala: Amygdala,
    regions: Vec<Box<dyn BrainRegion>>,
    current_time: f64,
    memory_traces: VecDeque<SimulationState>,
}

impl NeuroSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self::build(config, None)
    }

    /// Deterministic construction: every region circuit and the amygdala
    /// jitter draw from seeds derived from `seed`.
    pub fn with_seed(config: SimulatorConfig, seed: u64) -> Self {
        Self::build(config, Some(seed))
    }

    fn build(config: SimulatorConfig, seed: Option<u64>) -> Self {
        let router = BrainRouter::new(RoutingConfig {
            autism_hypersensitivity: config.autism_mode,
            ptsd_hypervigilance: config.ptsd_overlay,
            amygdala_sensitivity: if config.ptsd_overlay { 1.5 } else { 1.0 },
            ..Default::default()
        });

        let fusion = MultiModalFusion::new(FusionConfig {
            autism_sensory_hypersensitivity: config.autism_mode,
            ptsd_hypervigilance: config.ptsd_overlay,
            ..Default::default()
        });

        let flashback = FlashbackOverlay::new(FlashbackConfig {
            base_trigger_sensitivity: config.flashback_sensitivity,
            ..Default::default()
        });

        let circuit_config = CircuitConfig {
            autism_mode: config.autism_mode,
            ptsd_mode: config.ptsd_overlay,
            ei_ratio: config.excitation_ratio,
            inhibition_delay_ms: config.inhibition_delay,
            ..Default::default()
        };

        let amygdala_config = AmygdalaConfig {
            autism_social_hypersensitivity: config.autism_mode,
            ptsd_hypervigilance: config.ptsd_overlay,
            ptsd_trauma_sensitivity: if config.ptsd_overlay { 2.0 } else { 1.0 },
            ..Default::default()
        };

        let region_config =
            |name: &str| RegionConfig::named(name, circuit_config.clone());

        let amygdala = match seed {
            Some(seed) => {
                Amygdala::with_seed(region_config("Amygdala"), amygdala_config, seed)
            }
            None => Amygdala::new(region_config("Amygdala"), amygdala_config),
        };

        let regions: Vec<Box<dyn BrainRegion>> = match seed {
            Some(seed) => vec![
                Box::new(Hippocampus::with_seed(region_config("Hippocampus"), seed + 1)),
                Box::new(Insula::with_seed(region_config("Insula"), seed + 2)),
                Box::new(Prefrontal::with_seed(region_config("PFC"), seed + 3)),
                Box::new(Cerebellum::with_seed(region_config("Cerebellum"), seed + 4)),
                Box::new(CircuitRegion::with_seed(region_config("STG"), seed + 5)),
                Box::new(CircuitRegion::with_seed(region_config("ACC"), seed + 6)),
            ],
            None => vec![
                Box::new(Hippocampus::new(region_config("Hippocampus"))),
                Box::new(Insula::new(region_config("Insula"))),
                Box::new(Prefrontal::new(region_config("PFC"))),
                Box::new(Cerebellum::new(region_config("Cerebellum"))),
                Box::new(CircuitRegion::new(region_config("STG"))),
                Box::new(CircuitRegion::new(region_config("ACC"))),
            ],
        };

        tracing::info!(
            autism = config.autism_mode,
            ptsd = config.ptsd_overlay,
            "simulator initialized"
        );

        Self {
            config,
            router,
            fusion,
            flashback,
            amygdala,
            regions,
            current_time: 0.0,
            memory_traces: VecDeque::new(),
        }
    }

    /// Run one full processing cycle.
    pub fn process(&mut self, input: &MultiModalInput) -> SimulationState {
        self.current_time += 1.0;

        let mut state = SimulationState {
            timestamp: self.current_time,
            ..Default::default()
        };

        let fused = self.fusion.fuse(&SensoryInput {
            visual: input.visual_embedding.clone(),
            auditory: input.audio_embedding.clone(),
            vestibular: input.vestibular_embedding.clone(),
            interoceptive: input.interoceptive_embedding.clone(),
            timestamp: input.timestamp,
            ..Default::default()
        });

        let tokens: Vec<String> = input
            .text_tokens
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let routed = self.router.route_tokens(&tokens);

        for activation in &routed {
            let output = if activation.region_name == self.amygdala.name() {
                self.amygdala
                    .process_input(activation.activation_strength, 1.0)
            } else if let Some(region) = self
                .regions
                .iter_mut()
                .find(|r| r.name() == activation.region_name)
            {
                region.process_input(activation.activation_strength, 1.0)
            } else {
                continue;
            };
            state
                .region_activations
                .insert(activation.region_name.clone(), output);
        }

        if self.config.ptsd_overlay {
            state.flashback_triggered = self.flashback.check_trigger(&fused.unified_embedding);
            self.flashback.process_flashback(1.0);
            if state.flashback_triggered {
                // Flashbacks flood the amygdala
                if let Some(amygdala) = state.region_activations.get_mut("Amygdala") {
                    *amygdala = (*amygdala * 1.5).min(1.0);
                }
            }
        }

        state.microcircuit_state = self.microcircuit_summary();
        state.multimodal_context = multimodal_context(&fused);
        state.response_text = select_response(&state, &self.config).to_string();

        self.memory_traces.push_back(state.clone());
        if self.memory_traces.len() > MAX_MEMORY_TRACES {
            self.memory_traces.pop_front();
        }

        tracing::debug!(
            t = state.timestamp,
            response = %state.response_text,
            excitation = state.microcircuit_state.excitation,
            inhibition = state.microcircuit_state.inhibition,
            looping = state.microcircuit_state.looping,
            flashback = state.flashback_triggered,
            "simulation tick"
        );

        state
    }

    /// Text-only convenience path: zeroed embeddings, whitespace tokens.
    pub fn process_text(&mut self, text: &str) -> SimulationState {
        let [visual, audio, vestibular, interoceptive] =
            TEXT_ONLY_DIMS.map(|dim| vec![0.0; dim]);
        self.process(&MultiModalInput {
            visual_embedding: visual,
            audio_embedding: audio,
            vestibular_embedding: vestibular,
            interoceptive_embedding: interoceptive,
            text_tokens: text.to_string(),
            timestamp: self.current_time,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Replace the configuration and propagate the overlay flags to the
    /// router and fusion layers. Existing region circuits keep their
    /// construction-time parameters.
    pub fn update_config(&mut self, config: SimulatorConfig) {
        self.config = config;

        let mut router_config = self.router.config().clone();
        router_config.autism_hypersensitivity = self.config.autism_mode;
        router_config.ptsd_hypervigilance = self.config.ptsd_overlay;
        self.router.update_config(router_config);

        let mut fusion_config = self.fusion.config().clone();
        fusion_config.autism_sensory_hypersensitivity = self.config.autism_mode;
        fusion_config.ptsd_hypervigilance = self.config.ptsd_overlay;
        self.fusion.update_config(fusion_config);
    }

    /// Register a trauma memory with both the flashback overlay and the
    /// amygdala.
    pub fn add_trauma_memory(&mut self, trauma_embedding: Vec<f64>, trigger_threshold: f64) {
        self.flashback.add_trauma_template(
            trauma_embedding.clone(),
            trigger_threshold,
            "general",
        );
        self.amygdala
            .add_trauma_template(trauma_embedding, trigger_threshold);
    }

    /// Longitudinal memory traces, oldest first (capped).
    pub fn memory_traces(&self) -> &VecDeque<SimulationState> {
        &self.memory_traces
    }

    pub fn clear_memory(&mut self) {
        self.memory_traces.clear();
    }

    pub fn flashback_overlay(&self) -> &FlashbackOverlay {
        &self.flashback
    }

    pub fn amygdala(&self) -> &Amygdala {
        &self.amygdala
    }

    /// Return to the initial timeline: clears traces and component
    /// histories. Region circuits keep evolving from their current state.
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.memory_traces.clear();
        self.router.clear_history();
        self.fusion.clear_history();
    }

    /// Mean E/I across every region circuit, with the condition overlays
    /// applied to the aggregate.
    fn microcircuit_summary(&self) -> MicrocircuitSummary {
        let mut total_excitation = 0.0;
        let mut total_inhibition = 0.0;
        let mut count = 0usize;

        let amygdala_state = self.amygdala.microcircuit_state();
        total_excitation += amygdala_state.excitatory_activity;
        total_inhibition += amygdala_state.inhibitory_activity;
        count += 1;

        for region in &self.regions {
            let circuit_state = region.microcircuit_state();
            total_excitation += circuit_state.excitatory_activity;
            total_inhibition += circuit_state.inhibitory_activity;
            count += 1;
        }

        let mut summary = MicrocircuitSummary {
            excitation: total_excitation / count as f64,
            inhibition: total_inhibition / count as f64,
            looping: false,
        };

        if self.config.autism_mode {
            summary.excitation *= self.config.excitation_ratio;
            summary.inhibition *= 0.7;
        }
        if self.config.ptsd_overlay {
            summary.inhibition *= 0.8;
        }

        summary.looping = summary.excitation / summary.inhibition.max(0.1) > LOOPING_RATIO;
        summary
    }
}

fn multimodal_context(fused: &FusedRepresentation) -> MultimodalContext {
    MultimodalContext {
        audio_pitch: if fused.fusion_metadata.dominant_modality == "auditory" {
            "high"
        } else {
            "normal"
        }
        .to_string(),
        image_tag: if fused.fusion_metadata.dominant_modality == "visual" {
            "detected"
        } else {
            "none"
        }
        .to_string(),
        body_state: if fused.autism_metrics.hypersensitivity_activation > 0.7 {
            "rigid"
        } else {
            "neutral"
        }
        .to_string(),
        heartbeat: if fused.ptsd_metrics.threat_salience > 0.6 {
            "elevated"
        } else {
            "normal"
        }
        .to_string(),
    }
}

/// Canned response selection from the brain state, in priority order.
fn select_response(state: &SimulationState, config: &SimulatorConfig) -> &'static str {
    let amygdala_activation = state
        .region_activations
        .get("Amygdala")
        .copied()
        .unwrap_or(0.0);

    if state.flashback_triggered {
        "No. No. I don't want it."
    } else if amygdala_activation > 0.8 {
        "I'm scared."
    } else if state.microcircuit_state.looping {
        "Too much. Too much."
    } else if config.autism_mode && state.multimodal_context.body_state == "rigid" {
        "Need quiet."
    } else {
        "Okay."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(
        amygdala: f64,
        looping: bool,
        flashback: bool,
        body_state: &str,
    ) -> SimulationState {
        let mut state = SimulationState::default();
        state.region_activations.insert("Amygdala".into(), amygdala);
        state.microcircuit_state.looping = looping;
        state.flashback_triggered = flashback;
        state.multimodal_context.body_state = body_state.to_string();
        state
    }

    #[test]
    fn response_priority_order() {
        let config = SimulatorConfig {
            autism_mode: true,
            ..Default::default()
        };

        // Flashback wins over everything
        assert_eq!(
            select_response(&state_with(1.0, true, true, "rigid"), &config),
            "No. No. I don't want it."
        );
        // Then amygdala flooding
        assert_eq!(
            select_response(&state_with(0.9, true, false, "rigid"), &config),
            "I'm scared."
        );
        // Then looping
        assert_eq!(
            select_response(&state_with(0.5, true, false, "rigid"), &config),
            "Too much. Too much."
        );
        // Then autism sensory shutdown
        assert_eq!(
            select_response(&state_with(0.5, false, false, "rigid"), &config),
            "Need quiet."
        );
        // Baseline
        assert_eq!(
            select_response(&state_with(0.5, false, false, "neutral"), &config),
            "Okay."
        );
    }

    #[test]
    fn need_quiet_requires_autism_mode() {
        let config = SimulatorConfig::default();
        assert_eq!(
            select_response(&state_with(0.0, false, false, "rigid"), &config),
            "Okay."
        );
    }

    #[test]
    fn context_labels_follow_fused_metrics() {
        let mut fused = FusedRepresentation::default();
        fused.fusion_metadata.dominant_modality = "auditory".to_string();
        fused.autism_metrics.hypersensitivity_activation = 0.9;
        fused.ptsd_metrics.threat_salience = 0.7;

        let context = multimodal_context(&fused);
        assert_eq!(context.audio_pitch, "high");
        assert_eq!(context.image_tag, "none");
        assert_eq!(context.body_state, "rigid");
        assert_eq!(context.heartbeat, "elevated");
    }

    #[test]
    fn summary_defaults_to_balanced() {
        let summary = MicrocircuitSummary::default();
        assert_eq!(summary.excitation, 1.0);
        assert_eq!(summary.inhibition, 1.0);
        assert!(!summary.looping);
    }
}
