//! Thin gain-multiplier regions.
//!
//! These regions ship as one-line stubs: each drives its circuit and
//! reports the input scaled by a fixed gain. The gains are the shipped
//! values, not tuned here.

use crate::region::{BrainRegion, CircuitRegion, RegionConfig};
use neurosim_core::ActivationState;

const HIPPOCAMPUS_GAIN: f64 = 0.5;
const INSULA_GAIN: f64 = 0.6;
const PREFRONTAL_GAIN: f64 = 0.4;
const CEREBELLUM_GAIN: f64 = 0.3;

macro_rules! gain_region {
    ($(#[$doc:meta])* $name:ident, $gain:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: CircuitRegion,
        }

        impl $name {
            pub fn new(config: RegionConfig) -> Self {
                Self {
                    base: CircuitRegion::new(config),
                }
            }

            pub fn with_seed(config: RegionConfig, seed: u64) -> Self {
                Self {
                    base: CircuitRegion::with_seed(config, seed),
                }
            }

            pub const fn gain() -> f64 {
                $gain
            }
        }

        impl BrainRegion for $name {
            fn name(&self) -> &str {
                self.base.name()
            }

            fn process_input(&mut self, input: f64, dt: f64) -> f64 {
                self.base.drive(input, dt);
                let activation = input * $gain;
                self.base.set_activation(activation);
                activation
            }

            fn activation(&self) -> f64 {
                self.base.activation()
            }

            fn microcircuit_state(&self) -> &ActivationState {
                self.base.microcircuit_state()
            }
        }
    };
}

gain_region!(
    /// Memory encoding and contextual processing.
    Hippocampus,
    HIPPOCAMPUS_GAIN
);
gain_region!(
    /// Interoceptive and emotional awareness.
    Insula,
    INSULA_GAIN
);
gain_region!(
    /// Executive control and inhibition.
    Prefrontal,
    PREFRONTAL_GAIN
);
gain_region!(
    /// Motor and cognitive coordination.
    Cerebellum,
    CEREBELLUM_GAIN
);
