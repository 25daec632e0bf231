//! Trauma reactivation overlay.
//!
//! Stored trauma templates are matched against the fused sensory embedding
//! by cosine similarity. A match over the effective threshold starts a
//! flashback episode whose intensity decays over time and raises a
//! hypervigilance level that decays more slowly. Grounding damps both.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use neurosim_regions::cosine_similarity;

/// Cap on recorded flashback episodes.
const MAX_FLASHBACK_HISTORY: usize = 1000;

/// Intensity below which an episode counts as over.
const INTENSITY_FLOOR: f64 = 0.05;

/// A stored trauma pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraumaTemplate {
    pub pattern: Vec<f64>,
    /// Cosine match required to trigger, before sensitivity scaling
    pub trigger_threshold: f64,
    /// Emotional charge of the trauma (scales episode intensity)
    pub emotional_intensity: f64,
    pub trauma_type: String,
}

/// Flashback system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashbackConfig {
    /// Trigger sensitivity (0-1); higher values lower the effective
    /// match threshold
    pub base_trigger_sensitivity: f64,
    /// Intensity above which hypervigilance engages
    pub hypervigilance_threshold: f64,
    /// Episode length ceiling (ms)
    pub flashback_duration_base: f64,
    /// Intensity decay rate (fraction per second)
    pub flashback_intensity_decay: f64,
    /// Hypervigilance decay rate (fraction per second)
    pub hypervigilance_decay: f64,
}

impl Default for FlashbackConfig {
    fn default() -> Self {
        Self {
            base_trigger_sensitivity: 0.7,
            hypervigilance_threshold: 0.6,
            flashback_duration_base: 5000.0,
            flashback_intensity_decay: 0.1,
            hypervigilance_decay: 0.05,
        }
    }
}

/// Current flashback episode state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashbackState {
    pub flashback_active: bool,
    /// Episode intensity (0-1)
    pub intensity: f64,
    /// How long the episode has run (ms)
    pub duration_ms: f64,
    /// Trauma type that triggered the episode
    pub trigger_type: String,
    /// Hypervigilance level (0-1), decays slower than the episode
    pub hypervigilance_level: f64,
}

/// PTSD flashback trigger detection and episode dynamics.
#[derive(Debug, Clone, Default)]
pub struct FlashbackOverlay {
    config: FlashbackConfig,
    templates: Vec<TraumaTemplate>,
    state: FlashbackState,
    history: VecDeque<FlashbackState>,
}

impl FlashbackOverlay {
    pub fn new(config: FlashbackConfig) -> Self {
        Self {
            config,
            templates: Vec::new(),
            state: FlashbackState::default(),
            history: VecDeque::new(),
        }
    }

    /// Match the input pattern against every trauma template; the
    /// strongest match over its effective threshold starts (or re-fuels)
    /// an episode. Returns whether anything triggered.
    pub fn check_trigger(&mut self, input_pattern: &[f64]) -> bool {
        let mut triggered = false;

        for template in &self.templates {
            let strength = cosine_similarity(input_pattern, &template.pattern);
            if strength >= self.effective_threshold(template) {
                triggered = true;
                let intensity = (strength * template.emotional_intensity).min(1.0);
                if intensity > self.state.intensity {
                    self.state.intensity = intensity;
                    self.state.trigger_type = template.trauma_type.clone();
                }
                self.state.flashback_active = true;
                self.state.duration_ms = 0.0;
                self.state.hypervigilance_level =
                    self.state.hypervigilance_level.max(intensity);
                tracing::debug!(
                    strength,
                    trauma_type = %template.trauma_type,
                    "flashback triggered"
                );
            }
        }

        if triggered {
            self.history.push_back(self.state.clone());
            if self.history.len() > MAX_FLASHBACK_HISTORY {
                self.history.pop_front();
            }
        }
        triggered
    }

    /// Advance episode dynamics by `dt` milliseconds.
    pub fn process_flashback(&mut self, dt: f64) -> &FlashbackState {
        if self.state.flashback_active {
            self.state.duration_ms += dt;
            self.state.intensity *=
                1.0 - self.config.flashback_intensity_decay * dt / 1000.0;

            if self.state.intensity < INTENSITY_FLOOR
                || self.state.duration_ms >= self.config.flashback_duration_base
            {
                self.state.flashback_active = false;
                self.state.intensity = 0.0;
            }
        }

        self.state.hypervigilance_level *=
            1.0 - self.config.hypervigilance_decay * dt / 1000.0;

        &self.state
    }

    /// Therapeutic grounding: damps the episode and, at half strength,
    /// the hypervigilance behind it.
    pub fn apply_grounding(&mut self, grounding_strength: f64) {
        let strength = grounding_strength.clamp(0.0, 1.0);
        self.state.intensity *= 1.0 - strength;
        self.state.hypervigilance_level *= 1.0 - strength * 0.5;
        if self.state.intensity < INTENSITY_FLOOR {
            self.state.flashback_active = false;
            self.state.intensity = 0.0;
        }
    }

    pub fn add_trauma_template(
        &mut self,
        pattern: Vec<f64>,
        trigger_threshold: f64,
        trauma_type: impl Into<String>,
    ) {
        self.templates.push(TraumaTemplate {
            pattern,
            trigger_threshold,
            emotional_intensity: 1.0,
            trauma_type: trauma_type.into(),
        });
    }

    pub fn trauma_templates(&self) -> &[TraumaTemplate] {
        &self.templates
    }

    pub fn clear_trauma_templates(&mut self) {
        self.templates.clear();
    }

    pub fn current_state(&self) -> &FlashbackState {
        &self.state
    }

    pub fn config(&self) -> &FlashbackConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: FlashbackConfig) {
        self.config = config;
    }

    /// Episode history, oldest first (capped).
    pub fn flashback_history(&self) -> &VecDeque<FlashbackState> {
        &self.history
    }

    /// Higher sensitivity lowers the match required to trigger.
    fn effective_threshold(&self, template: &TraumaTemplate) -> f64 {
        template.trigger_threshold * (1.0 - self.config.base_trigger_sensitivity * 0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay_with_template() -> FlashbackOverlay {
        let mut overlay = FlashbackOverlay::default();
        overlay.add_trauma_template(vec![1.0, 0.0], 0.8, "combat");
        overlay
    }

    #[test]
    fn no_templates_never_triggers() {
        let mut overlay = FlashbackOverlay::default();
        assert!(!overlay.check_trigger(&[1.0, 0.0]));
        assert!(!overlay.current_state().flashback_active);
    }

    #[test]
    fn matching_pattern_triggers_episode() {
        let mut overlay = overlay_with_template();
        assert!(overlay.check_trigger(&[2.0, 0.0]));

        let state = overlay.current_state();
        assert!(state.flashback_active);
        assert!((state.intensity - 1.0).abs() < 1e-12);
        assert_eq!(state.trigger_type, "combat");
        assert!(state.hypervigilance_level > 0.0);
        assert_eq!(overlay.flashback_history().len(), 1);
    }

    #[test]
    fn orthogonal_pattern_does_not_trigger() {
        let mut overlay = overlay_with_template();
        assert!(!overlay.check_trigger(&[0.0, 1.0]));
    }

    #[test]
    fn sensitivity_lowers_the_trigger_bar() {
        // Partial match: cosine ≈ 0.707 against threshold 0.8
        let pattern = [1.0, 1.0];

        let mut blunt = FlashbackOverlay::new(FlashbackConfig {
            base_trigger_sensitivity: 0.0,
            ..Default::default()
        });
        blunt.add_trauma_template(vec![1.0, 0.0], 0.8, "general");
        assert!(!blunt.check_trigger(&pattern));

        let mut sensitive = FlashbackOverlay::new(FlashbackConfig {
            base_trigger_sensitivity: 0.7,
            ..Default::default()
        });
        sensitive.add_trauma_template(vec![1.0, 0.0], 0.8, "general");
        // Effective threshold 0.8 × 0.79 = 0.632 < 0.707
        assert!(sensitive.check_trigger(&pattern));
    }

    #[test]
    fn intensity_decays_until_episode_ends() {
        let mut overlay = overlay_with_template();
        overlay.check_trigger(&[1.0, 0.0]);

        let first = overlay.process_flashback(100.0).intensity;
        let second = overlay.process_flashback(100.0).intensity;
        assert!(second < first);

        // Runs past the duration ceiling
        for _ in 0..60 {
            overlay.process_flashback(100.0);
        }
        assert!(!overlay.current_state().flashback_active);
        assert_eq!(overlay.current_state().intensity, 0.0);
    }

    #[test]
    fn hypervigilance_outlives_the_episode() {
        let mut overlay = overlay_with_template();
        overlay.check_trigger(&[1.0, 0.0]);
        for _ in 0..60 {
            overlay.process_flashback(100.0);
        }
        assert!(!overlay.current_state().flashback_active);
        assert!(overlay.current_state().hypervigilance_level > 0.0);
    }

    #[test]
    fn grounding_damps_the_episode() {
        let mut overlay = overlay_with_template();
        overlay.check_trigger(&[1.0, 0.0]);

        overlay.apply_grounding(0.7);
        assert!((overlay.current_state().intensity - 0.3).abs() < 1e-12);
        assert!(overlay.current_state().flashback_active);

        overlay.apply_grounding(1.0);
        assert!(!overlay.current_state().flashback_active);
        assert_eq!(overlay.current_state().intensity, 0.0);
    }

    #[test]
    fn retriggering_resets_duration() {
        let mut overlay = overlay_with_template();
        overlay.check_trigger(&[1.0, 0.0]);
        overlay.process_flashback(2000.0);
        assert!(overlay.current_state().duration_ms > 0.0);

        overlay.check_trigger(&[1.0, 0.0]);
        assert_eq!(overlay.current_state().duration_ms, 0.0);
    }
}
