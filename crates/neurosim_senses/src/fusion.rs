//! Weighted multi-modal fusion.
//!
//! Four modality embeddings are zero-padded to a common dimension, summed
//! under fixed weights, and L2-normalized. Derived metrics (overload,
//! conflict, gating, per-condition metrics) all reduce to thresholds on
//! embedding magnitudes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Unified embedding dimension when every modality is absent.
pub const DEFAULT_EMBEDDING_DIM: usize = 512;

/// Cap on the fusion history.
const MAX_FUSION_HISTORY: usize = 1000;

/// Magnitude above which a modality counts as overwhelming (autism).
const OVERWHELMING_MAGNITUDE: f64 = 0.7;
/// Magnitude above which a modality counts as a trauma trigger (PTSD).
const TRIGGER_MAGNITUDE: f64 = 0.6;

pub const MODALITY_NAMES: [&str; 4] = ["visual", "auditory", "vestibular", "interoceptive"];

/// Fusion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    pub visual_weight: f64,
    pub auditory_weight: f64,
    pub vestibular_weight: f64,
    pub interoceptive_weight: f64,

    /// Enhanced sensory processing under the autism overlay
    pub autism_sensory_hypersensitivity: bool,
    /// Enhanced threat detection under the PTSD overlay
    pub ptsd_hypervigilance: bool,

    /// Overload level above which sensory gating engages
    pub sensory_gating_threshold: f64,
    /// Cross-modal adaptation rate
    pub cross_modal_plasticity: f64,
    /// Temporal integration window (ms)
    pub temporal_integration_window: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            visual_weight: 0.4,
            auditory_weight: 0.3,
            vestibular_weight: 0.15,
            interoceptive_weight: 0.15,

            autism_sensory_hypersensitivity: false,
            ptsd_hypervigilance: false,

            sensory_gating_threshold: 0.5,
            cross_modal_plasticity: 0.1,
            temporal_integration_window: 500.0,
        }
    }
}

/// One tick of multi-modal sensory input. Empty vectors mark absent
/// modalities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensoryInput {
    pub visual: Vec<f64>,
    pub auditory: Vec<f64>,
    pub vestibular: Vec<f64>,
    pub interoceptive: Vec<f64>,
    pub timestamp: f64,
    pub confidence: f64,
}

impl Default for SensoryInput {
    fn default() -> Self {
        Self {
            visual: Vec::new(),
            auditory: Vec::new(),
            vestibular: Vec::new(),
            interoceptive: Vec::new(),
            timestamp: 0.0,
            confidence: 1.0,
        }
    }
}

impl SensoryInput {
    /// Input with full confidence and no modality data.
    pub fn at(timestamp: f64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    fn modalities(&self) -> [&Vec<f64>; 4] {
        [
            &self.visual,
            &self.auditory,
            &self.vestibular,
            &self.interoceptive,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionMetadata {
    /// Most influential sensory modality
    pub dominant_modality: String,
    /// Conflict between modality magnitudes (0-1)
    pub cross_modal_conflict: f64,
    /// Whether sensory gating engaged
    pub sensory_gating_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutismMetrics {
    /// Sensory hypersensitivity level (0-1)
    pub hypersensitivity_activation: f64,
    /// Modalities over the overwhelming threshold
    pub overwhelming_modalities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtsdMetrics {
    /// Threat-related sensory activation (0-1)
    pub threat_salience: f64,
    /// Modalities over the trigger threshold
    pub trigger_modalities: Vec<String>,
}

/// Fused multi-modal representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusedRepresentation {
    pub unified_embedding: Vec<f64>,
    /// Per-modality contribution weights, normalized to sum to 1
    pub modality_contributions: [f64; 4],
    /// Confidence in the fusion result (0-1)
    pub fusion_confidence: f64,
    /// Sensory processing load
    pub sensory_overload: f64,
    pub fusion_metadata: FusionMetadata,
    pub autism_metrics: AutismMetrics,
    pub ptsd_metrics: PtsdMetrics,
}

/// Integrates the four sensory streams into one representation per tick.
#[derive(Debug, Clone, Default)]
pub struct MultiModalFusion {
    config: FusionConfig,
    history: VecDeque<FusedRepresentation>,
    temporal_buffer: Vec<SensoryInput>,
}

impl MultiModalFusion {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            config,
            history: VecDeque::new(),
            temporal_buffer: Vec::new(),
        }
    }

    /// Fuse one input tick.
    pub fn fuse(&mut self, input: &SensoryInput) -> FusedRepresentation {
        let mut result = FusedRepresentation {
            modality_contributions: self.modality_contributions(input),
            unified_embedding: self.weighted_fusion(input),
            ..Default::default()
        };

        let conflict = cross_modal_conflict(input);
        let overload = self.sensory_overload(input);

        result.fusion_confidence = (input.confidence
            * (1.0 - conflict * 0.5)
            * (1.0 - overload * 0.3))
            .clamp(0.0, 1.0);
        result.sensory_overload = overload;

        result.fusion_metadata = FusionMetadata {
            dominant_modality: dominant_modality(&result.modality_contributions).to_string(),
            cross_modal_conflict: conflict,
            sensory_gating_active: overload > self.config.sensory_gating_threshold,
        };

        if self.config.autism_sensory_hypersensitivity {
            result.autism_metrics = autism_metrics(input);
            // Second scaling on top of the hypersensitive overload above;
            // shipped behavior, kept as-is (see DESIGN.md)
            result.sensory_overload *= 1.3;
        }
        if self.config.ptsd_hypervigilance {
            result.ptsd_metrics = ptsd_metrics(input);
        }

        self.history.push_back(result.clone());
        if self.history.len() > MAX_FUSION_HISTORY {
            self.history.pop_front();
        }

        tracing::trace!(
            dominant = %result.fusion_metadata.dominant_modality,
            overload = result.sensory_overload,
            "fused sensory input"
        );

        result
    }

    /// Fuse a temporal sequence: the latest input drives the metrics, the
    /// unified embedding becomes a recency-weighted integration over the
    /// whole sequence.
    pub fn fuse_temporal_sequence(&mut self, inputs: &[SensoryInput]) -> FusedRepresentation {
        let Some(latest) = inputs.last() else {
            return FusedRepresentation::default();
        };

        for input in inputs {
            self.update_temporal_buffer(input);
        }

        let integrated = self.temporal_integration(inputs);
        let mut result = self.fuse(latest);
        result.unified_embedding = integrated;
        result
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn update_config(&mut self, config: FusionConfig) {
        self.config = config;
    }

    /// Fusion history, oldest first (capped).
    pub fn fusion_history(&self) -> &VecDeque<FusedRepresentation> {
        &self.history
    }

    pub fn temporal_buffer(&self) -> &[SensoryInput] {
        &self.temporal_buffer
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.temporal_buffer.clear();
    }

    fn weighted_fusion(&self, input: &SensoryInput) -> Vec<f64> {
        let max_size = input
            .modalities()
            .iter()
            .map(|m| m.len())
            .max()
            .unwrap_or(0);
        if max_size == 0 {
            return vec![0.0; DEFAULT_EMBEDDING_DIM];
        }

        let mut fused = vec![0.0; max_size];
        for (modality, weight) in input.modalities().into_iter().zip(self.weights()) {
            for (slot, value) in fused.iter_mut().zip(modality) {
                *slot += weight * value;
            }
        }
        l2_normalize(fused)
    }

    fn modality_contributions(&self, input: &SensoryInput) -> [f64; 4] {
        let mut contributions = [0.0; 4];
        for (i, (modality, weight)) in input.modalities().into_iter().zip(self.weights()).enumerate()
        {
            contributions[i] = magnitude(modality) * weight;
        }
        let total: f64 = contributions.iter().sum();
        if total > 0.0 {
            for contribution in &mut contributions {
                *contribution /= total;
            }
        }
        contributions
    }

    fn sensory_overload(&self, input: &SensoryInput) -> f64 {
        let present: Vec<f64> = input
            .modalities()
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| magnitude(m))
            .collect();
        if present.is_empty() {
            return 0.0;
        }

        let mut average = present.iter().sum::<f64>() / present.len() as f64;
        if self.config.autism_sensory_hypersensitivity {
            average *= 1.5;
        }
        average.min(1.0)
    }

    fn update_temporal_buffer(&mut self, input: &SensoryInput) {
        self.temporal_buffer.push(input.clone());
        let window = self.config.temporal_integration_window;
        let now = input.timestamp;
        self.temporal_buffer
            .retain(|buffered| now - buffered.timestamp <= window);
    }

    /// Recency-weighted average of the per-input fusions.
    fn temporal_integration(&self, inputs: &[SensoryInput]) -> Vec<f64> {
        let mut integrated = vec![0.0; DEFAULT_EMBEDDING_DIM];
        let mut total_weight = 0.0;

        for (i, input) in inputs.iter().enumerate() {
            let recency_weight = (i + 1) as f64 / inputs.len() as f64;
            let fused = self.weighted_fusion(input);
            if integrated.len() != fused.len() {
                integrated = vec![0.0; fused.len()];
            }
            for (slot, value) in integrated.iter_mut().zip(&fused) {
                *slot += recency_weight * value;
            }
            total_weight += recency_weight;
        }

        if total_weight > 0.0 {
            for slot in &mut integrated {
                *slot /= total_weight;
            }
        }
        integrated
    }

    fn weights(&self) -> [f64; 4] {
        [
            self.config.visual_weight,
            self.config.auditory_weight,
            self.config.vestibular_weight,
            self.config.interoceptive_weight,
        ]
    }
}

fn dominant_modality(contributions: &[f64; 4]) -> &'static str {
    let mut max_index = 0;
    for (i, contribution) in contributions.iter().enumerate() {
        if *contribution > contributions[max_index] {
            max_index = i;
        }
    }
    MODALITY_NAMES[max_index]
}

/// Variance of the present modality magnitudes, capped at 1. Fewer than
/// two modalities cannot conflict.
fn cross_modal_conflict(input: &SensoryInput) -> f64 {
    let magnitudes: Vec<f64> = input
        .modalities()
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| magnitude(m))
        .collect();
    if magnitudes.len() < 2 {
        return 0.0;
    }

    let mean = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;
    let variance = magnitudes
        .iter()
        .map(|m| (m - mean) * (m - mean))
        .sum::<f64>()
        / magnitudes.len() as f64;
    variance.min(1.0)
}

fn autism_metrics(input: &SensoryInput) -> AutismMetrics {
    let max_intensity = input
        .modalities()
        .iter()
        .map(|m| magnitude(m))
        .fold(0.0, f64::max);

    let overwhelming = input
        .modalities()
        .iter()
        .zip(MODALITY_NAMES)
        .filter(|(m, _)| !m.is_empty() && magnitude(m) > OVERWHELMING_MAGNITUDE)
        .map(|(_, name)| name.to_string())
        .collect();

    AutismMetrics {
        hypersensitivity_activation: (max_intensity * 1.5).min(1.0),
        overwhelming_modalities: overwhelming,
    }
}

fn ptsd_metrics(input: &SensoryInput) -> PtsdMetrics {
    // Auditory, vestibular and interoceptive intensity read as threat
    let threat = magnitude(&input.auditory) * 0.4
        + magnitude(&input.vestibular) * 0.3
        + magnitude(&input.interoceptive) * 0.3;

    let mut triggers = Vec::new();
    if magnitude(&input.auditory) > TRIGGER_MAGNITUDE {
        triggers.push("auditory".to_string());
    }
    if magnitude(&input.visual) > TRIGGER_MAGNITUDE {
        triggers.push("visual".to_string());
    }

    PtsdMetrics {
        threat_salience: threat.min(1.0),
        trigger_modalities: triggers,
    }
}

pub(crate) fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn l2_normalize(mut v: Vec<f64>) -> Vec<f64> {
    let norm = magnitude(&v);
    if norm > 0.0 {
        for value in &mut v {
            *value /= norm;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with(visual: Vec<f64>, auditory: Vec<f64>) -> SensoryInput {
        SensoryInput {
            visual,
            auditory,
            confidence: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_fuses_to_default_dimension() {
        let mut fusion = MultiModalFusion::default();
        let result = fusion.fuse(&SensoryInput::at(0.0));
        assert_eq!(result.unified_embedding.len(), DEFAULT_EMBEDDING_DIM);
        assert!(result.unified_embedding.iter().all(|v| *v == 0.0));
        assert_eq!(result.sensory_overload, 0.0);
        assert_eq!(result.fusion_metadata.cross_modal_conflict, 0.0);
    }

    #[test]
    fn unified_embedding_is_l2_normalized() {
        let mut fusion = MultiModalFusion::default();
        let result = fusion.fuse(&input_with(vec![3.0, 4.0], vec![1.0, 1.0]));
        let norm = magnitude(&result.unified_embedding);
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fusion_pads_to_largest_modality() {
        let mut fusion = MultiModalFusion::default();
        let result = fusion.fuse(&input_with(vec![1.0, 1.0, 1.0, 1.0], vec![1.0]));
        assert_eq!(result.unified_embedding.len(), 4);
    }

    #[test]
    fn contributions_normalize_to_one() {
        let mut fusion = MultiModalFusion::default();
        let result = fusion.fuse(&input_with(vec![2.0], vec![2.0]));
        let total: f64 = result.modality_contributions.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        // Visual weight 0.4 beats auditory 0.3 at equal magnitude
        assert_eq!(result.fusion_metadata.dominant_modality, "visual");
    }

    #[test]
    fn dominant_modality_follows_magnitude() {
        let mut fusion = MultiModalFusion::default();
        let result = fusion.fuse(&input_with(vec![0.1], vec![5.0]));
        assert_eq!(result.fusion_metadata.dominant_modality, "auditory");
    }

    #[test]
    fn conflict_requires_two_modalities() {
        let mut fusion = MultiModalFusion::default();
        let single = fusion.fuse(&input_with(vec![5.0], vec![]));
        assert_eq!(single.fusion_metadata.cross_modal_conflict, 0.0);

        let divergent = fusion.fuse(&input_with(vec![3.0], vec![0.1]));
        assert!(divergent.fusion_metadata.cross_modal_conflict > 0.0);
        assert!(divergent.fusion_metadata.cross_modal_conflict <= 1.0);
    }

    #[test]
    fn overload_gates_when_threshold_exceeded() {
        let mut fusion = MultiModalFusion::default();
        let quiet = fusion.fuse(&input_with(vec![0.1], vec![0.1]));
        assert!(!quiet.fusion_metadata.sensory_gating_active);

        let intense = fusion.fuse(&input_with(vec![2.0], vec![2.0]));
        assert!(intense.fusion_metadata.sensory_gating_active);
        assert_eq!(intense.sensory_overload, 1.0);
    }

    #[test]
    fn confidence_drops_with_conflict_and_overload() {
        let mut fusion = MultiModalFusion::default();
        let clean = fusion.fuse(&input_with(vec![0.2], vec![0.2]));
        let stressed = fusion.fuse(&input_with(vec![3.0], vec![0.1]));
        assert!(stressed.fusion_confidence < clean.fusion_confidence);
        assert!((0.0..=1.0).contains(&stressed.fusion_confidence));
    }

    #[test]
    fn autism_overlay_raises_overload_and_reports_metrics() {
        let mut plain = MultiModalFusion::default();
        let mut autism = MultiModalFusion::new(FusionConfig {
            autism_sensory_hypersensitivity: true,
            ..Default::default()
        });

        let input = input_with(vec![0.5], vec![0.8]);
        let base = plain.fuse(&input);
        let modified = autism.fuse(&input);

        assert!(modified.sensory_overload > base.sensory_overload);
        assert!(modified.autism_metrics.hypersensitivity_activation > 0.0);
        assert_eq!(
            modified.autism_metrics.overwhelming_modalities,
            vec!["auditory"]
        );
        assert!(base.autism_metrics.overwhelming_modalities.is_empty());
    }

    #[test]
    fn ptsd_overlay_reads_threat_from_nonvisual_channels() {
        let mut fusion = MultiModalFusion::new(FusionConfig {
            ptsd_hypervigilance: true,
            ..Default::default()
        });

        let input = SensoryInput {
            auditory: vec![1.0],
            vestibular: vec![0.5],
            interoceptive: vec![0.5],
            confidence: 1.0,
            ..Default::default()
        };
        let result = fusion.fuse(&input);
        // 1.0×0.4 + 0.5×0.3 + 0.5×0.3
        assert!((result.ptsd_metrics.threat_salience - 0.7).abs() < 1e-12);
        assert_eq!(result.ptsd_metrics.trigger_modalities, vec!["auditory"]);
    }

    #[test]
    fn temporal_buffer_evicts_outside_window() {
        let mut fusion = MultiModalFusion::default();
        let inputs = vec![
            SensoryInput::at(0.0),
            SensoryInput::at(100.0),
            SensoryInput::at(700.0),
        ];
        fusion.fuse_temporal_sequence(&inputs);
        // 0.0 and 100.0 fall outside the 500 ms window ending at 700.0
        assert_eq!(fusion.temporal_buffer().len(), 1);
        assert_eq!(fusion.temporal_buffer()[0].timestamp, 700.0);
    }

    #[test]
    fn temporal_sequence_weights_recent_inputs_heavier() {
        let mut fusion = MultiModalFusion::default();
        let early = input_with(vec![1.0, 0.0], vec![]);
        let late = input_with(vec![0.0, 1.0], vec![]);
        let result = fusion.fuse_temporal_sequence(&[early, late]);
        // Later input carries weight 2/3 vs 1/3
        assert!(result.unified_embedding[1] > result.unified_embedding[0]);
    }

    #[test]
    fn empty_sequence_returns_default() {
        let mut fusion = MultiModalFusion::default();
        let result = fusion.fuse_temporal_sequence(&[]);
        assert!(result.unified_embedding.is_empty());
    }

    #[test]
    fn history_caps_and_clears() {
        let mut fusion = MultiModalFusion::default();
        for i in 0..1100 {
            fusion.fuse(&SensoryInput::at(i as f64));
        }
        assert_eq!(fusion.fusion_history().len(), 1000);

        fusion.clear_history();
        assert!(fusion.fusion_history().is_empty());
        assert!(fusion.temporal_buffer().is_empty());
    }
}
