//! Token-to-region routing.
//!
//! Analyzes each token against the lexicons, accumulates per-region
//! activation strengths with the shipped formulas, attaches a latency
//! estimate (stronger activation responds faster), and applies the
//! autism/PTSD routing modifications last.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::lexicon;

/// Cap on the routing history.
const MAX_ROUTING_HISTORY: usize = 1000;

/// Higher activation shortens latency by up to this fraction.
const LATENCY_ACTIVATION_DISCOUNT: f64 = 0.3;

/// Per-token analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAnalysis {
    pub token: String,
    /// Emotional charge (-1 to 1)
    pub emotional_valence: f64,
    /// Arousal/activation level (0 to 1)
    pub arousal_level: f64,
    /// Social interaction relevance (0 to 1)
    pub social_relevance: f64,
    /// Perceived threat level (0 to 1)
    pub threat_level: f64,
    /// Sensory processing load (0 to 1)
    pub sensory_intensity: f64,
    pub semantic_categories: Vec<String>,
}

/// One region's activation for a routed token batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionActivation {
    pub region_name: String,
    /// Activation intensity (0 to 1)
    pub activation_strength: f64,
    /// Activation latency in milliseconds
    pub latency_ms: f64,
    /// Tokens that drove this region
    pub contributing_tokens: Vec<String>,
    pub activation_reason: String,
}

/// Routing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Enhanced sensory routing under the autism overlay
    pub autism_hypersensitivity: bool,
    /// Enhanced threat detection under the PTSD overlay
    pub ptsd_hypervigilance: bool,
    /// Amygdala activation gain
    pub amygdala_sensitivity: f64,
    /// PFC inhibitory control strength
    pub prefrontal_inhibition: f64,
    /// Social brain network sensitivity
    pub social_processing_bias: f64,
    /// Sensory filtering strength
    pub sensory_gating: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            autism_hypersensitivity: false,
            ptsd_hypervigilance: false,
            amygdala_sensitivity: 1.0,
            prefrontal_inhibition: 1.0,
            social_processing_bias: 1.0,
            sensory_gating: 1.0,
        }
    }
}

/// Routes token batches to the seven fixed brain regions.
#[derive(Debug, Clone)]
pub struct BrainRouter {
    config: RoutingConfig,
    history: VecDeque<Vec<RegionActivation>>,
}

impl BrainRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
        }
    }

    /// Analyze a token batch and produce the seven region activations, in
    /// the fixed order Amygdala, Hippocampus, Insula, PFC, Cerebellum,
    /// STG, ACC.
    pub fn route_tokens(&mut self, tokens: &[String]) -> Vec<RegionActivation> {
        let analyses: Vec<TokenAnalysis> =
            tokens.iter().map(|t| self.analyze_token(t)).collect();

        let mut activations = vec![
            self.route_to_amygdala(&analyses),
            self.route_to_hippocampus(&analyses),
            self.route_to_insula(&analyses),
            self.route_to_prefrontal(&analyses),
            self.route_to_cerebellum(&analyses),
            self.route_to_stg(&analyses),
            self.route_to_acc(&analyses),
        ];

        if self.config.autism_hypersensitivity {
            apply_autism_modifications(&mut activations);
        }
        if self.config.ptsd_hypervigilance {
            apply_ptsd_modifications(&mut activations);
        }

        self.history.push_back(activations.clone());
        if self.history.len() > MAX_ROUTING_HISTORY {
            self.history.pop_front();
        }

        tracing::debug!(
            tokens = tokens.len(),
            amygdala = activations[0].activation_strength,
            "routed token batch"
        );

        activations
    }

    /// Score one token against every lexicon.
    pub fn analyze_token(&self, token: &str) -> TokenAnalysis {
        let emotional_valence = lexicon::emotional_valence(token);
        let threat_level = lexicon::threat_level(token);
        TokenAnalysis {
            token: token.to_string(),
            emotional_valence,
            // Emotional and threat content both arouse
            arousal_level: (emotional_valence.abs() + threat_level).min(1.0),
            social_relevance: lexicon::social_relevance(token),
            threat_level,
            sensory_intensity: lexicon::sensory_intensity(token),
            semantic_categories: lexicon::semantic_categories(token)
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: RoutingConfig) {
        self.config = config;
    }

    /// Routing history, oldest batch first (capped).
    pub fn activation_history(&self) -> &VecDeque<Vec<RegionActivation>> {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn route_to_amygdala(&self, analyses: &[TokenAnalysis]) -> RegionActivation {
        let mut total_threat = 0.0;
        let mut total_emotional = 0.0;
        let mut contributing = Vec::new();

        for analysis in analyses {
            if analysis.threat_level > 0.3 || analysis.emotional_valence.abs() > 0.5 {
                total_threat += analysis.threat_level;
                total_emotional += analysis.emotional_valence.abs();
                contributing.push(analysis.token.clone());
            }
        }

        let strength =
            ((total_threat + total_emotional) * self.config.amygdala_sensitivity).min(1.0);
        region_activation(
            "Amygdala",
            strength,
            contributing,
            "Threat detection and emotional processing",
        )
    }

    fn route_to_hippocampus(&self, analyses: &[TokenAnalysis]) -> RegionActivation {
        let mut memory_relevance: f64 = 0.0;
        let mut contributing = Vec::new();

        for analysis in analyses {
            // Any classifiable content engages memory encoding
            if !analysis.semantic_categories.is_empty() {
                memory_relevance += 0.3;
                contributing.push(analysis.token.clone());
            }
        }

        region_activation(
            "Hippocampus",
            memory_relevance.min(1.0),
            contributing,
            "Memory encoding and contextual processing",
        )
    }

    fn route_to_insula(&self, analyses: &[TokenAnalysis]) -> RegionActivation {
        let mut interoceptive_relevance = 0.0;
        let mut contributing = Vec::new();

        for analysis in analyses {
            if analysis.sensory_intensity > 0.4 || analysis.emotional_valence.abs() > 0.4 {
                interoceptive_relevance +=
                    analysis.sensory_intensity + analysis.emotional_valence.abs() * 0.5;
                contributing.push(analysis.token.clone());
            }
        }

        region_activation(
            "Insula",
            interoceptive_relevance.min(1.0),
            contributing,
            "Interoceptive and emotional processing",
        )
    }

    fn route_to_prefrontal(&self, analyses: &[TokenAnalysis]) -> RegionActivation {
        // Cognitive load scales with batch size
        let cognitive_load = (analyses.len() as f64 * 0.2).min(1.0);
        region_activation(
            "PFC",
            cognitive_load * self.config.prefrontal_inhibition,
            Vec::new(),
            "Executive control and cognitive processing",
        )
    }

    fn route_to_cerebellum(&self, analyses: &[TokenAnalysis]) -> RegionActivation {
        let coordination_demand = (analyses.len() as f64 * 0.15).min(1.0);
        region_activation(
            "Cerebellum",
            coordination_demand,
            Vec::new(),
            "Motor and cognitive coordination",
        )
    }

    fn route_to_stg(&self, analyses: &[TokenAnalysis]) -> RegionActivation {
        let language_processing = (analyses.len() as f64 * 0.25).min(1.0);
        region_activation(
            "STG",
            language_processing,
            Vec::new(),
            "Auditory and language processing",
        )
    }

    fn route_to_acc(&self, analyses: &[TokenAnalysis]) -> RegionActivation {
        let mut conflict_monitoring: f64 = 0.0;
        for analysis in analyses {
            if analysis.emotional_valence.abs() > 0.5 || analysis.threat_level > 0.4 {
                conflict_monitoring += 0.3;
            }
        }
        region_activation(
            "ACC",
            conflict_monitoring.min(1.0),
            Vec::new(),
            "Conflict monitoring and emotional regulation",
        )
    }
}

impl Default for BrainRouter {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

fn region_activation(
    region_name: &str,
    activation_strength: f64,
    contributing_tokens: Vec<String>,
    activation_reason: &'static str,
) -> RegionActivation {
    RegionActivation {
        latency_ms: latency(region_name, activation_strength),
        region_name: region_name.to_string(),
        activation_strength,
        contributing_tokens,
        activation_reason: activation_reason.to_string(),
    }
}

/// Region base latency discounted by activation strength.
fn latency(region_name: &str, activation_strength: f64) -> f64 {
    let base = match region_name {
        "Amygdala" => 100.0,
        "Hippocampus" => 150.0,
        "Insula" => 120.0,
        "PFC" => 200.0,
        "Cerebellum" => 80.0,
        "STG" => 110.0,
        "ACC" => 130.0,
        _ => 150.0,
    };
    base * (1.0 - activation_strength * LATENCY_ACTIVATION_DISCOUNT)
}

fn apply_autism_modifications(activations: &mut [RegionActivation]) {
    for activation in activations {
        match activation.region_name.as_str() {
            // Enhanced social threat detection
            "Amygdala" => activation.activation_strength *= 1.3,
            // Sensory hypersensitivity
            "Insula" => activation.activation_strength *= 1.4,
            // Reduced inhibitory control
            "PFC" => activation.activation_strength *= 0.7,
            _ => {}
        }
    }
}

fn apply_ptsd_modifications(activations: &mut [RegionActivation]) {
    for activation in activations {
        match activation.region_name.as_str() {
            "Amygdala" => {
                // Hypervigilance: stronger and faster threat detection
                activation.activation_strength *= 1.5;
                activation.latency_ms *= 0.7;
            }
            // Impaired inhibitory control
            "PFC" => activation.activation_strength *= 0.6,
            // Memory fragmentation
            "Hippocampus" => activation.activation_strength *= 0.8,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn routes_to_seven_regions_in_fixed_order() {
        let mut router = BrainRouter::default();
        let activations = router.route_tokens(&tokens(&["hello"]));
        let names: Vec<&str> = activations.iter().map(|a| a.region_name.as_str()).collect();
        assert_eq!(
            names,
            ["Amygdala", "Hippocampus", "Insula", "PFC", "Cerebellum", "STG", "ACC"]
        );
    }

    #[test]
    fn threat_tokens_drive_the_amygdala() {
        let mut router = BrainRouter::default();
        let neutral = router.route_tokens(&tokens(&["table"]))[0].clone();
        let threat = router.route_tokens(&tokens(&["danger", "explosion"]))[0].clone();

        assert_eq!(neutral.activation_strength, 0.0);
        assert_eq!(threat.activation_strength, 1.0); // 0.9 + 0.95 capped
        assert_eq!(threat.contributing_tokens, vec!["danger", "explosion"]);
        // Stronger activation responds faster
        assert!(threat.latency_ms < neutral.latency_ms);
    }

    #[test]
    fn hippocampus_counts_classifiable_tokens() {
        let mut router = BrainRouter::default();
        let activations = router.route_tokens(&tokens(&["happy", "friend", "xyzzy"]));
        let hippocampus = &activations[1];
        // Two classifiable tokens at 0.3 each
        assert!((hippocampus.activation_strength - 0.6).abs() < 1e-12);
        assert_eq!(hippocampus.contributing_tokens, vec!["happy", "friend"]);
    }

    #[test]
    fn batch_size_drives_pfc_stg_cerebellum() {
        let mut router = BrainRouter::default();
        let activations = router.route_tokens(&tokens(&["a", "b", "c"]));
        assert!((activations[3].activation_strength - 0.6).abs() < 1e-12); // PFC 3×0.2
        assert!((activations[4].activation_strength - 0.45).abs() < 1e-12); // Cerebellum 3×0.15
        assert!((activations[5].activation_strength - 0.75).abs() < 1e-12); // STG 3×0.25
    }

    #[test]
    fn arousal_combines_valence_and_threat() {
        let router = BrainRouter::default();
        let analysis = router.analyze_token("fear");
        // |−0.9| + 0.0 threat
        assert!((analysis.arousal_level - 0.9).abs() < 1e-12);

        let loud = router.analyze_token("loud");
        assert!((loud.arousal_level - 0.4).abs() < 1e-12);
    }

    #[test]
    fn autism_modifications_scale_amygdala_insula_pfc() {
        let mut plain = BrainRouter::default();
        let mut autism = BrainRouter::new(RoutingConfig {
            autism_hypersensitivity: true,
            ..Default::default()
        });

        let words = tokens(&["loud", "crowd", "scared"]);
        let base = plain.route_tokens(&words);
        let modified = autism.route_tokens(&words);

        assert!((modified[0].activation_strength - base[0].activation_strength * 1.3).abs() < 1e-9);
        assert!((modified[2].activation_strength - base[2].activation_strength * 1.4).abs() < 1e-9);
        assert!((modified[3].activation_strength - base[3].activation_strength * 0.7).abs() < 1e-9);
        // Untouched regions match exactly
        assert_eq!(modified[4], base[4]);
    }

    #[test]
    fn ptsd_modifications_speed_up_the_amygdala() {
        let mut plain = BrainRouter::default();
        let mut ptsd = BrainRouter::new(RoutingConfig {
            ptsd_hypervigilance: true,
            ..Default::default()
        });

        let words = tokens(&["danger"]);
        let base = plain.route_tokens(&words);
        let modified = ptsd.route_tokens(&words);

        assert!((modified[0].activation_strength - base[0].activation_strength * 1.5).abs() < 1e-9);
        assert!((modified[0].latency_ms - base[0].latency_ms * 0.7).abs() < 1e-9);
        assert!((modified[1].activation_strength - base[1].activation_strength * 0.8).abs() < 1e-9);
        assert!((modified[3].activation_strength - base[3].activation_strength * 0.6).abs() < 1e-9);
    }

    #[test]
    fn history_caps_at_limit() {
        let mut router = BrainRouter::default();
        for i in 0..1100 {
            router.route_tokens(&tokens(&[if i % 2 == 0 { "happy" } else { "sad" }]));
        }
        assert_eq!(router.activation_history().len(), 1000);

        router.clear_history();
        assert!(router.activation_history().is_empty());
    }

    #[test]
    fn empty_batch_still_produces_all_regions() {
        let mut router = BrainRouter::default();
        let activations = router.route_tokens(&[]);
        assert_eq!(activations.len(), 7);
        for activation in &activations {
            assert_eq!(activation.activation_strength, 0.0);
        }
    }
}
