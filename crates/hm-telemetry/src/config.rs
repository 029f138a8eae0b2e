use hm_core::{PerPhase, Phase};
use serde::{Deserialize, Serialize};

/// Validation targets and plausibility bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Expected relative change of the daily trip count against the
    /// baseline day.  `None` means the phase has no target.
    pub target_change:   PerPhase<Option<f64>>,
    /// 24-bin hourly reference distribution.  Normalised before use.
    pub reference:       Vec<f64>,
    /// Floor applied to simulated bins in the KL divergence.
    pub kl_floor:        f64,
    /// Inclusive `(min, max)` daily trip counts considered plausible.
    pub plausible_daily: PerPhase<(u64, u64)>,
}

impl TelemetryConfig {
    pub fn target(&self, phase: Phase) -> Option<f64> {
        *self.target_change.get(phase)
    }

    pub fn is_plausible(&self, phase: Phase, count: u64) -> bool {
        let (lo, hi) = *self.plausible_daily.get(phase);
        (lo..=hi).contains(&count)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            target_change: PerPhase::new(None, Some(-0.65), Some(-0.30)),
            // Normal-regime hourly trip shares.
            reference: vec![
                0.02, 0.01, 0.005, 0.002, 0.01, 0.03, 0.08, 0.15, 0.18, 0.12, 0.08, 0.06,
                0.14, 0.08, 0.06, 0.07, 0.12, 0.16, 0.14, 0.10, 0.08, 0.06, 0.04, 0.03,
            ],
            kl_floor:        1e-6,
            plausible_daily: PerPhase::new((0, 5), (0, 3), (0, 4)),
        }
    }
}
