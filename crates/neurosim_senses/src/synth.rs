//! Synthetic sensory embedding generators.
//!
//! Stand-ins for real perception: each generator turns a free-text
//! description into a deterministic pseudo-random embedding of the
//! configured dimension plus fixed metadata labels. The same description
//! always yields the same embedding for a given seed, which makes
//! downstream trauma/trigger matching reproducible.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default embedding dimensions per modality.
pub const VISION_DIM: usize = 512;
pub const AUDIO_DIM: usize = 256;
pub const VESTIBULAR_DIM: usize = 128;
pub const INTEROCEPTIVE_DIM: usize = 64;

/// Uniform [-1, 1) embedding derived from the instance seed and the
/// description hash.
fn description_embedding(seed: u64, description: &str, dimension: usize) -> Vec<f64> {
    let mut hasher = DefaultHasher::new();
    description.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(seed ^ hasher.finish());
    (0..dimension).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Synthesized visual scene features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEmbedding {
    pub feature_embedding: Vec<f64>,
    pub scene_category: String,
    pub visual_complexity: f64,
    pub processing_confidence: f64,
}

/// Visual scene synthesizer.
#[derive(Debug, Clone)]
pub struct VisionSynth {
    dimension: usize,
    seed: u64,
}

impl VisionSynth {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            dimension: VISION_DIM,
            seed,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn process_scene(&self, description: &str) -> VisualEmbedding {
        VisualEmbedding {
            feature_embedding: description_embedding(self.seed, description, self.dimension),
            scene_category: "simulated".to_string(),
            visual_complexity: 0.3,
            processing_confidence: 0.7,
        }
    }
}

impl Default for VisionSynth {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesized auditory features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioEmbedding {
    pub feature_embedding: Vec<f64>,
    pub sound_category: String,
    pub emotional_tone: String,
    /// Average pitch (Hz)
    pub average_pitch: f64,
    pub processing_confidence: f64,
}

/// Auditory scene synthesizer.
#[derive(Debug, Clone)]
pub struct AudioSynth {
    dimension: usize,
    seed: u64,
}

impl AudioSynth {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            dimension: AUDIO_DIM,
            seed,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn process_sound(&self, description: &str) -> AudioEmbedding {
        AudioEmbedding {
            feature_embedding: description_embedding(self.seed, description, self.dimension),
            sound_category: "simulated".to_string(),
            emotional_tone: "neutral".to_string(),
            average_pitch: 200.0,
            processing_confidence: 0.7,
        }
    }
}

impl Default for AudioSynth {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesized balance/motion features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestibularEmbedding {
    pub feature_embedding: Vec<f64>,
    pub motion_type: String,
    pub balance_stability: f64,
    pub processing_confidence: f64,
}

/// Balance/motion synthesizer.
#[derive(Debug, Clone)]
pub struct VestibularSynth {
    dimension: usize,
    seed: u64,
}

impl VestibularSynth {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            dimension: VESTIBULAR_DIM,
            seed,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn process_motion(&self, description: &str) -> VestibularEmbedding {
        VestibularEmbedding {
            feature_embedding: description_embedding(self.seed, description, self.dimension),
            motion_type: "simulated".to_string(),
            balance_stability: 0.7,
            processing_confidence: 0.7,
        }
    }
}

impl Default for VestibularSynth {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesized internal body-state features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteroceptiveEmbedding {
    pub feature_embedding: Vec<f64>,
    pub autonomic_state: String,
    pub emotional_state: String,
    pub overall_arousal: f64,
    pub processing_confidence: f64,
}

/// Internal body-state synthesizer.
#[derive(Debug, Clone)]
pub struct InteroceptiveSynth {
    dimension: usize,
    seed: u64,
}

impl InteroceptiveSynth {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            dimension: INTEROCEPTIVE_DIM,
            seed,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn process_body_state(&self, description: &str) -> InteroceptiveEmbedding {
        InteroceptiveEmbedding {
            feature_embedding: description_embedding(self.seed, description, self.dimension),
            autonomic_state: "simulated".to_string(),
            emotional_state: "neutral".to_string(),
            overall_arousal: 0.5,
            processing_confidence: 0.7,
        }
    }
}

impl Default for InteroceptiveSynth {
    fn default() -> Self {
        Self::new()
    }
}
