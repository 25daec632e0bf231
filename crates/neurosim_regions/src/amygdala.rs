//! Amygdala: threat appraisal, fear response, habituation/sensitization,
//! and trauma-template matching layered over the shared circuit base.
//!
//! Per tick the region drives its microcircuit, appraises threat from the
//! input magnitude (with a small uniform jitter), derives arousal and fear,
//! applies habituation then sensitization, and finally the condition
//! overlays. Habituation and sensitization are slow state: exposure builds
//! habituation, high threat builds sensitization, and both decay toward
//! zero when unstimulated.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::region::{cosine_similarity, BrainRegion, CircuitRegion, RegionConfig};
use neurosim_core::ActivationState;

/// Cap on stored emotional memories.
const MAX_EMOTIONAL_MEMORIES: usize = 1000;
/// Cosine match above which a trauma template counts as activated.
const TRAUMA_ACTIVATION_THRESHOLD: f64 = 0.7;
/// Lower cosine threshold for PTSD memory intrusion.
const INTRUSION_MATCH_THRESHOLD: f64 = 0.6;

/// Amygdala-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmygdalaConfig {
    /// Sensitivity to threat-related stimuli
    pub threat_sensitivity: f64,
    /// Bias toward social threat detection
    pub social_threat_bias: f64,
    /// Rate of emotional memory formation
    pub memory_consolidation_rate: f64,
    /// Rate of threat habituation
    pub habituation_rate: f64,

    // Autism overlay
    pub autism_social_hypersensitivity: bool,
    /// Broader threat generalization under the autism overlay
    pub autism_threat_generalization: f64,
    /// Reduced emotional control under the autism overlay
    pub autism_emotional_dysregulation: f64,

    // PTSD overlay
    pub ptsd_hypervigilance: bool,
    /// Enhanced trauma-related activation under the PTSD overlay
    pub ptsd_trauma_sensitivity: f64,
    /// Arousal dysregulation under the PTSD overlay
    pub ptsd_emotional_dysregulation: f64,
    /// Rate of intrusive memory activation
    pub ptsd_memory_intrusion_rate: f64,
}

impl Default for AmygdalaConfig {
    fn default() -> Self {
        Self {
            threat_sensitivity: 0.7,
            social_threat_bias: 0.5,
            memory_consolidation_rate: 0.3,
            habituation_rate: 0.1,

            autism_social_hypersensitivity: false,
            autism_threat_generalization: 1.5,
            autism_emotional_dysregulation: 1.3,

            ptsd_hypervigilance: false,
            ptsd_trauma_sensitivity: 2.0,
            ptsd_emotional_dysregulation: 1.2,
            ptsd_memory_intrusion_rate: 0.4,
        }
    }
}

/// Amygdala activation state beyond the underlying circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmygdalaState {
    /// Current perceived threat level (0-1)
    pub threat_level: f64,
    /// Emotional arousal level (0-1)
    pub emotional_arousal: f64,
    /// Fear response intensity
    pub fear_response: f64,
    /// Social anxiety level
    pub social_anxiety: f64,

    /// Fight-or-flight response active
    pub fight_flight_active: bool,
    /// Emotional memory formation in progress
    pub memory_consolidation_active: bool,
    /// Trauma flashback state
    pub trauma_flashback_triggered: bool,

    /// Current habituation to stimuli (0-1)
    pub habituation_level: f64,
    /// Current sensitization level (0-1)
    pub sensitization_level: f64,
}

/// A stored trauma pattern with its activation sensitivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraumaTemplate {
    pub pattern: Vec<f64>,
    pub sensitivity: f64,
}

/// Threat-processing region over the circuit base.
#[derive(Debug, Clone)]
pub struct Amygdala {
    base: CircuitRegion,
    config: AmygdalaConfig,
    state: AmygdalaState,
    trauma_templates: Vec<TraumaTemplate>,
    /// (pattern, valence) pairs, oldest evicted first
    emotional_memories: VecDeque<(Vec<f64>, f64)>,
    jitter: StdRng,
}

impl Amygdala {
    pub fn new(region_config: RegionConfig, config: AmygdalaConfig) -> Self {
        Self {
            base: CircuitRegion::new(region_config),
            config,
            state: AmygdalaState::default(),
            trauma_templates: Vec::new(),
            emotional_memories: VecDeque::new(),
            jitter: StdRng::from_entropy(),
        }
    }

    /// Deterministic construction: seeds both the circuit noise and the
    /// threat-appraisal jitter.
    pub fn with_seed(region_config: RegionConfig, config: AmygdalaConfig, seed: u64) -> Self {
        Self {
            base: CircuitRegion::with_seed(region_config, seed),
            config,
            state: AmygdalaState::default(),
            trauma_templates: Vec::new(),
            emotional_memories: VecDeque::new(),
            jitter: StdRng::seed_from_u64(seed.wrapping_add(1)),
        }
    }

    pub fn amygdala_state(&self) -> &AmygdalaState {
        &self.state
    }

    pub fn config(&self) -> &AmygdalaConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: AmygdalaConfig) {
        self.config = config;
    }

    /// Multi-modal threat appraisal: weighted combination of visual,
    /// auditory (biased up), and social threat cues.
    pub fn process_threat_assessment(
        &mut self,
        visual: &[f64],
        auditory: &[f64],
        social_context: &[f64],
    ) -> f64 {
        let visual_threat = self.threat_from_magnitude(magnitude(visual));
        let auditory_threat = self.threat_from_magnitude(magnitude(auditory)) * 1.2;
        let social_threat = self.social_threat(social_context);

        let mut combined = visual_threat * 0.4 + auditory_threat * 0.4 + social_threat * 0.2;

        if self.config.autism_social_hypersensitivity {
            combined += social_threat * 0.5;
        }
        if self.config.ptsd_hypervigilance {
            combined *= self.config.ptsd_trauma_sensitivity;
        }

        self.state.threat_level = combined.min(1.0);
        self.state.threat_level
    }

    /// Store an emotional memory when arousal is high enough to consolidate.
    pub fn process_memory_consolidation(&mut self, emotional_valence: f64, content: &[f64]) {
        if self.state.emotional_arousal > 0.3 {
            self.emotional_memories
                .push_back((content.to_vec(), emotional_valence));
            if self.emotional_memories.len() > MAX_EMOTIONAL_MEMORIES {
                self.emotional_memories.pop_front();
            }
            self.state.memory_consolidation_active = true;
        } else {
            self.state.memory_consolidation_active = false;
        }
    }

    /// Match the input against stored trauma templates; a strong match
    /// flips the flashback flag and boosts arousal. Returns the best match.
    pub fn check_trauma_activation(&mut self, input_pattern: &[f64]) -> f64 {
        let mut max_match = 0.0f64;
        for template in &self.trauma_templates {
            let strength = cosine_similarity(input_pattern, &template.pattern);
            max_match = max_match.max(strength);

            if strength > TRAUMA_ACTIVATION_THRESHOLD {
                self.state.trauma_flashback_triggered = true;
                self.state.emotional_arousal =
                    (self.state.emotional_arousal + strength * 0.5).min(1.0);
                tracing::debug!(strength, "trauma template activated");
            }
        }
        max_match
    }

    pub fn add_trauma_template(&mut self, pattern: Vec<f64>, sensitivity: f64) {
        self.trauma_templates.push(TraumaTemplate {
            pattern,
            sensitivity,
        });
    }

    pub fn trauma_templates(&self) -> &[TraumaTemplate] {
        &self.trauma_templates
    }

    pub fn emotional_memories(&self) -> &VecDeque<(Vec<f64>, f64)> {
        &self.emotional_memories
    }

    fn threat_from_magnitude(&mut self, magnitude: f64) -> f64 {
        let threat =
            magnitude * self.config.threat_sensitivity + self.jitter.gen_range(-0.1..0.1);
        threat.clamp(0.0, 1.0)
    }

    fn social_threat(&self, social_context: &[f64]) -> f64 {
        if social_context.is_empty() {
            return 0.0;
        }
        let mut threat = magnitude(social_context) * self.config.social_threat_bias;
        if self.config.autism_social_hypersensitivity {
            threat *= self.config.autism_threat_generalization;
        }
        threat.clamp(0.0, 1.0)
    }

    fn emotional_arousal(&self, threat_level: f64, input_strength: f64) -> f64 {
        let mut arousal = threat_level * 0.7 + input_strength * 0.3;
        if self.config.autism_social_hypersensitivity {
            arousal *= self.config.autism_emotional_dysregulation;
        }
        if self.config.ptsd_hypervigilance {
            arousal *= self.config.ptsd_emotional_dysregulation;
        }
        arousal.clamp(0.0, 1.0)
    }

    fn update_habituation(&mut self, input_strength: f64, dt: f64) {
        let increment = input_strength * self.config.habituation_rate * dt / 1000.0;
        self.state.habituation_level = (self.state.habituation_level + increment).min(1.0);
        if input_strength < 0.1 {
            // Slow decay without stimulation
            self.state.habituation_level *= 0.999;
        }
    }

    fn update_sensitization(&mut self, threat_level: f64, dt: f64) {
        if threat_level > 0.7 {
            let increment = threat_level * 0.01 * dt / 1000.0;
            self.state.sensitization_level = (self.state.sensitization_level + increment).min(1.0);
        } else {
            self.state.sensitization_level *= 0.9995;
        }
    }

    fn check_memory_intrusion(&self, input_pattern: &[f64]) -> bool {
        self.trauma_templates
            .iter()
            .any(|t| cosine_similarity(input_pattern, &t.pattern) > INTRUSION_MATCH_THRESHOLD)
    }
}

impl BrainRegion for Amygdala {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn process_input(&mut self, input: f64, dt: f64) -> f64 {
        self.base.drive(input, dt);

        self.state.threat_level = self.threat_from_magnitude(input.abs());
        self.state.emotional_arousal = self.emotional_arousal(self.state.threat_level, input);
        self.state.fear_response = self.state.threat_level * self.state.emotional_arousal;

        // Habituation damps, sensitization amplifies, in that order.
        let habituated = self.state.fear_response * (1.0 - self.state.habituation_level * 0.5);
        let mut activation = habituated * (1.0 + self.state.sensitization_level * 0.3);

        self.update_habituation(input, dt);
        self.update_sensitization(self.state.threat_level, dt);

        let input_pattern = [input];
        if self.config.autism_social_hypersensitivity {
            activation *= self.config.autism_threat_generalization;
            self.state.social_anxiety = (input.abs() * 1.5).min(1.0);
            self.state.habituation_level *= 0.7;
        }
        if self.config.ptsd_hypervigilance {
            activation *= self.config.ptsd_trauma_sensitivity;
            if self.check_memory_intrusion(&input_pattern) {
                self.state.trauma_flashback_triggered = true;
                activation = (activation + 0.5).min(1.0);
            }
            self.state.habituation_level *= 0.5;
        }

        self.state.fight_flight_active = activation > 0.7;
        self.state.memory_consolidation_active = self.state.emotional_arousal > 0.5;

        let clamped = activation.clamp(0.0, 1.0);
        self.base.set_activation(clamped);
        clamped
    }

    fn activation(&self) -> f64 {
        self.base.activation()
    }

    fn microcircuit_state(&self) -> &ActivationState {
        self.base.microcircuit_state()
    }
}

fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurosim_core::CircuitConfig;

    fn quiet_amygdala(config: AmygdalaConfig) -> Amygdala {
        let region_config = RegionConfig::named(
            "Amygdala",
            CircuitConfig {
                noise_level: 0.0,
                ..Default::default()
            },
        );
        Amygdala::with_seed(region_config, config, 7)
    }

    #[test]
    fn threat_tracks_input_magnitude_with_bounded_jitter() {
        let mut amygdala = quiet_amygdala(AmygdalaConfig::default());
        for _ in 0..100 {
            amygdala.process_input(1.0, 1.0);
            let threat = amygdala.amygdala_state().threat_level;
            // 1.0 * 0.7 sensitivity, jitter within ±0.1
            assert!((0.6..=0.8).contains(&threat), "threat {threat} out of band");
        }
    }

    #[test]
    fn activation_stays_in_unit_interval() {
        let mut amygdala = quiet_amygdala(AmygdalaConfig {
            autism_social_hypersensitivity: true,
            ptsd_hypervigilance: true,
            ..Default::default()
        });
        for i in 0..300 {
            let input = (i % 5) as f64;
            let activation = amygdala.process_input(input, 1.0);
            assert!((0.0..=1.0).contains(&activation));
        }
    }

    #[test]
    fn habituation_grows_with_exposure_and_decays_at_rest() {
        let mut amygdala = quiet_amygdala(AmygdalaConfig::default());
        for _ in 0..500 {
            amygdala.process_input(1.0, 10.0);
        }
        let habituated = amygdala.amygdala_state().habituation_level;
        assert!(habituated > 0.0);

        for _ in 0..500 {
            amygdala.process_input(0.0, 10.0);
        }
        assert!(amygdala.amygdala_state().habituation_level < habituated);
    }

    #[test]
    fn habituation_damps_repeated_fear_response() {
        let mut fresh = quiet_amygdala(AmygdalaConfig::default());
        let first = fresh.process_input(1.0, 1.0);

        let mut exposed = quiet_amygdala(AmygdalaConfig::default());
        // Long exposure builds habituation
        for _ in 0..2000 {
            exposed.process_input(1.0, 10.0);
        }
        let later = exposed.process_input(1.0, 1.0);
        // Jitter makes single ticks noisy; compare against a generous margin
        assert!(
            later < first + 0.05,
            "habituated response {later} should not exceed fresh response {first}"
        );
        assert!(exposed.amygdala_state().habituation_level > 0.5);
    }

    #[test]
    fn sensitization_builds_under_sustained_high_threat() {
        let mut amygdala = quiet_amygdala(AmygdalaConfig {
            threat_sensitivity: 1.0,
            ..Default::default()
        });
        for _ in 0..1000 {
            amygdala.process_input(1.0, 10.0);
        }
        assert!(amygdala.amygdala_state().sensitization_level > 0.0);

        let peak = amygdala.amygdala_state().sensitization_level;
        for _ in 0..1000 {
            amygdala.process_input(0.0, 10.0);
        }
        assert!(amygdala.amygdala_state().sensitization_level < peak);
    }

    #[test]
    fn trauma_template_match_triggers_flashback() {
        let mut amygdala = quiet_amygdala(AmygdalaConfig::default());
        amygdala.add_trauma_template(vec![1.0, 0.0, 1.0], 0.8);

        let strength = amygdala.check_trauma_activation(&[1.0, 0.0, 1.0]);
        assert!((strength - 1.0).abs() < 1e-12);
        assert!(amygdala.amygdala_state().trauma_flashback_triggered);

        let mut calm = quiet_amygdala(AmygdalaConfig::default());
        calm.add_trauma_template(vec![1.0, 0.0, 0.0], 0.8);
        let weak = calm.check_trauma_activation(&[0.0, 1.0, 0.0]);
        assert_eq!(weak, 0.0);
        assert!(!calm.amygdala_state().trauma_flashback_triggered);
    }

    #[test]
    fn consolidation_requires_arousal() {
        let mut amygdala = quiet_amygdala(AmygdalaConfig::default());
        amygdala.process_memory_consolidation(0.8, &[1.0, 2.0]);
        assert!(amygdala.emotional_memories().is_empty());

        // Raise arousal through a strong input, then consolidate
        amygdala.process_input(1.0, 1.0);
        assert!(amygdala.amygdala_state().emotional_arousal > 0.3);
        amygdala.process_memory_consolidation(0.8, &[1.0, 2.0]);
        assert_eq!(amygdala.emotional_memories().len(), 1);
        assert!(amygdala.amygdala_state().memory_consolidation_active);
    }

    #[test]
    fn threat_assessment_weights_modalities() {
        let mut amygdala = quiet_amygdala(AmygdalaConfig::default());
        let silent = amygdala.process_threat_assessment(&[], &[], &[]);
        // Only jitter contributes; stays near zero
        assert!(silent < 0.2);

        let loud = amygdala.process_threat_assessment(&[], &[2.0, 2.0], &[]);
        assert!(loud > silent);
        assert!(loud <= 1.0);
    }

    #[test]
    fn ptsd_scaling_raises_activation() {
        let mut plain = quiet_amygdala(AmygdalaConfig::default());
        let mut ptsd = quiet_amygdala(AmygdalaConfig {
            ptsd_hypervigilance: true,
            ..Default::default()
        });
        // Average over ticks to wash out jitter
        let mut plain_sum = 0.0;
        let mut ptsd_sum = 0.0;
        for _ in 0..200 {
            plain_sum += plain.process_input(0.4, 1.0);
            ptsd_sum += ptsd.process_input(0.4, 1.0);
        }
        assert!(ptsd_sum > plain_sum);
    }
}
