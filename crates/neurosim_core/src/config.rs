//! Circuit configuration and its validation boundary.
//!
//! The config is an immutable-per-run parameter bundle. By default the
//! engine accepts whatever it is given and lets the clamped arithmetic
//! absorb nonsense (Compat mode, matching the legacy behavior); Strict
//! mode rejects out-of-range parameters up front.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the strict validation boundary.
///
/// The default processing path never raises these; they exist for callers
/// that opt into `try_new` / `try_process`.
#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid time step: dt must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
}

/// How configuration misuse is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Reject out-of-range parameters with [`CircuitError`].
    Strict,
    /// Silently absorb them into defined arithmetic (legacy behavior).
    #[default]
    Compat,
}

/// Per-circuit parameter bundle.
///
/// The autism/PTSD flags are independent and composable; both may be
/// active at once, in which case their multipliers stack in the order
/// base → autism → PTSD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitConfig {
    /// Baseline excitatory drive
    pub baseline_excitation: f64,
    /// Baseline inhibitory drive
    pub baseline_inhibition: f64,
    /// Excitation/inhibition ratio multiplier
    pub ei_ratio: f64,
    /// Inhibitory response delay (ms)
    pub inhibition_delay_ms: f64,
    /// Circuit adaptation rate
    pub adaptation_rate: f64,
    /// Neural noise level (Gaussian std dev scale)
    pub noise_level: f64,

    // Autism overlay
    pub autism_mode: bool,
    /// Elevated E/I ratio under the autism overlay
    pub autism_ei_elevation: f64,
    /// Reduced inhibitory control (< 1) under the autism overlay
    pub autism_inhibition_deficit: f64,

    // PTSD overlay
    pub ptsd_mode: bool,
    /// Delayed inhibition (ms) under the PTSD overlay
    pub ptsd_inhibition_delay: f64,
    /// Elevated baseline arousal under the PTSD overlay
    pub ptsd_hyperarousal: f64,
    /// Per-tick memory intrusion probability under the PTSD overlay
    pub ptsd_memory_intrusion: f64,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            baseline_excitation: 1.0,
            baseline_inhibition: 1.0,
            ei_ratio: 1.0,
            inhibition_delay_ms: 10.0,
            adaptation_rate: 0.1,
            noise_level: 0.05,

            autism_mode: false,
            autism_ei_elevation: 1.4,
            autism_inhibition_deficit: 0.7,

            ptsd_mode: false,
            ptsd_inhibition_delay: 50.0,
            ptsd_hyperarousal: 1.5,
            ptsd_memory_intrusion: 0.3,
        }
    }
}

impl CircuitConfig {
    /// Preset matching the upstream "autism" configuration surface.
    pub fn autism_preset() -> Self {
        Self {
            autism_mode: true,
            ..Self::default()
        }
    }

    /// Preset matching the upstream "ptsd" configuration surface.
    pub fn ptsd_preset() -> Self {
        Self {
            ptsd_mode: true,
            ..Self::default()
        }
    }

    /// Run the config through the validation boundary.
    ///
    /// Strict mode rejects negative rates and probabilities outside [0, 1].
    /// Compat mode clamps the one genuinely undefined parameter (a negative
    /// Gaussian std dev scale) and lets everything else through untouched,
    /// matching the legacy engine.
    pub fn validated(mut self, mode: ValidationMode) -> Result<Self, CircuitError> {
        match mode {
            ValidationMode::Strict => {
                if !self.noise_level.is_finite() || self.noise_level < 0.0 {
                    return Err(CircuitError::InvalidConfiguration(format!(
                        "noise_level must be >= 0, got {}",
                        self.noise_level
                    )));
                }
                if !self.adaptation_rate.is_finite() || self.adaptation_rate < 0.0 {
                    return Err(CircuitError::InvalidConfiguration(format!(
                        "adaptation_rate must be >= 0, got {}",
                        self.adaptation_rate
                    )));
                }
                if !self.inhibition_delay_ms.is_finite() || self.inhibition_delay_ms < 0.0 {
                    return Err(CircuitError::InvalidConfiguration(format!(
                        "inhibition_delay_ms must be >= 0, got {}",
                        self.inhibition_delay_ms
                    )));
                }
                if !(0.0..=1.0).contains(&self.ptsd_memory_intrusion) {
                    return Err(CircuitError::InvalidConfiguration(format!(
                        "ptsd_memory_intrusion must be in [0, 1], got {}",
                        self.ptsd_memory_intrusion
                    )));
                }
                Ok(self)
            }
            ValidationMode::Compat => {
                if self.noise_level < 0.0 || !self.noise_level.is_finite() {
                    tracing::debug!(
                        noise_level = self.noise_level,
                        "clamping undefined noise_level to 0"
                    );
                    self.noise_level = 0.0;
                }
                Ok(self)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_strict_validation() {
        assert!(CircuitConfig::default()
            .validated(ValidationMode::Strict)
            .is_ok());
    }

    #[test]
    fn strict_rejects_negative_noise() {
        let config = CircuitConfig {
            noise_level: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validated(ValidationMode::Strict),
            Err(CircuitError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn strict_rejects_out_of_range_intrusion_probability() {
        let config = CircuitConfig {
            ptsd_memory_intrusion: 1.5,
            ..Default::default()
        };
        assert!(config.validated(ValidationMode::Strict).is_err());
    }

    #[test]
    fn compat_clamps_negative_noise_to_zero() {
        let config = CircuitConfig {
            noise_level: -0.5,
            ..Default::default()
        };
        let validated = config.validated(ValidationMode::Compat).unwrap();
        assert_eq!(validated.noise_level, 0.0);
    }

    #[test]
    fn compat_leaves_other_fields_untouched() {
        let config = CircuitConfig {
            adaptation_rate: -1.0,
            ..Default::default()
        };
        let validated = config.clone().validated(ValidationMode::Compat).unwrap();
        assert_eq!(validated.adaptation_rate, config.adaptation_rate);
    }

    #[test]
    fn presets_set_overlay_flags() {
        assert!(CircuitConfig::autism_preset().autism_mode);
        assert!(!CircuitConfig::autism_preset().ptsd_mode);
        assert!(CircuitConfig::ptsd_preset().ptsd_mode);
    }
}
