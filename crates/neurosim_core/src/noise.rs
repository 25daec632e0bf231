//! Injectable per-circuit noise source.
//!
//! The legacy engine drew from a function-local static generator shared by
//! every circuit in the process. Owning the generator per instance makes
//! noise sequences reproducible under seed injection; see DESIGN.md for the
//! behavioral-parity note.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Gaussian/uniform random source owned by a single microcircuit.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: StdRng,
}

impl NoiseSource {
    /// Entropy-seeded source (production default).
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for reproducible runs and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw the per-tick (excitatory, inhibitory) noise pair.
    ///
    /// Std dev scales with `noise_level * sqrt(dt)`; the inhibitory draw
    /// uses half that std dev. A negative noise level is undefined for a
    /// Gaussian sampler and is clamped to zero here.
    pub fn activity_pair(&mut self, noise_level: f64, dt: f64) -> (f64, f64) {
        let strength = noise_level.max(0.0) * dt.max(0.0).sqrt();
        if strength == 0.0 || !strength.is_finite() {
            return (0.0, 0.0);
        }
        let e: f64 = self.rng.sample(StandardNormal);
        let i: f64 = self.rng.sample(StandardNormal);
        (e * strength, i * strength * 0.5)
    }

    /// Independent Bernoulli trial with probability `p` (uniform draw in
    /// [0, 1) compared against `p`).
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Uniform draw in [low, high).
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}
