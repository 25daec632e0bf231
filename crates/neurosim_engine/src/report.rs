//! JSON activation report.
//!
//! The export layer reads fixed keys: `excitation`, `inhibition`, and
//! `looping` under `microcircuit_state` are guaranteed present after every
//! processing cycle, alongside the response, region activations, and
//! multimodal context labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::simulator::{MicrocircuitSummary, MultimodalContext, SimulationState};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize activation report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Exportable snapshot of one simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationReport {
    pub response: String,
    pub timestamp: f64,
    pub exported_at: DateTime<Utc>,
    pub flashback_triggered: bool,
    pub regions_triggered: BTreeMap<String, f64>,
    pub microcircuit_state: MicrocircuitSummary,
    pub multimodal_context: MultimodalContext,
}

impl ActivationReport {
    /// Snapshot a simulation state, stamped with the wall clock.
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            response: state.response_text.clone(),
            timestamp: state.timestamp,
            exported_at: Utc::now(),
            flashback_triggered: state.flashback_triggered,
            regions_triggered: state.region_activations.clone(),
            microcircuit_state: state.microcircuit_state.clone(),
            multimodal_context: state.multimodal_context.clone(),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, ReportError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> SimulationState {
        let mut state = SimulationState {
            response_text: "Okay.".to_string(),
            timestamp: 3.0,
            ..Default::default()
        };
        state.region_activations.insert("Amygdala".into(), 0.4);
        state.region_activations.insert("PFC".into(), 0.2);
        state
    }

    #[test]
    fn report_carries_the_fixed_keys() {
        let report = ActivationReport::from_state(&sample_state());
        let json = report.to_json().unwrap();

        assert_eq!(json["response"], "Okay.");
        assert_eq!(json["timestamp"], 3.0);
        assert_eq!(json["flashback_triggered"], false);
        assert_eq!(json["regions_triggered"]["Amygdala"], 0.4);

        let microcircuit = &json["microcircuit_state"];
        assert_eq!(microcircuit["excitation"], 1.0);
        assert_eq!(microcircuit["inhibition"], 1.0);
        assert_eq!(microcircuit["looping"], false);

        let context = &json["multimodal_context"];
        assert_eq!(context["audio_pitch"], "normal");
        assert_eq!(context["image_tag"], "none");
        assert_eq!(context["body_state"], "neutral");
        assert_eq!(context["heartbeat"], "normal");

        assert!(json["exported_at"].is_string());
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = ActivationReport::from_state(&sample_state());
        let text = report.to_json_string().unwrap();
        let back: ActivationReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.response, report.response);
        assert_eq!(back.regions_triggered, report.regions_triggered);
    }
}
