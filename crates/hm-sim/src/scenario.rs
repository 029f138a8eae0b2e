//! Whole-run configuration loaded from one JSON document.

use hm_behavior::EngineConfig;
use hm_core::SimConfig;
use hm_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

/// Every tunable of a run.  Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub sim:          SimConfig,
    pub engine:       EngineConfig,
    pub telemetry:    TelemetryConfig,
    /// Map units per simulated second.
    pub travel_speed: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sim:          SimConfig::default(),
            engine:       EngineConfig::default(),
            telemetry:    TelemetryConfig::default(),
            travel_speed: 10.0,
        }
    }
}

impl ScenarioConfig {
    pub fn from_json(text: &str) -> SimResult<ScenarioConfig> {
        let config: ScenarioConfig = serde_json::from_str(text).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        let tick = self.sim.tick_duration_secs;
        if tick == 0 || 3_600 % tick != 0 {
            return Err(SimError::Config(format!("tick_duration_secs {tick} must divide 3600")));
        }
        if !self.travel_speed.is_finite() || self.travel_speed <= 0.0 {
            return Err(SimError::Config(format!("travel_speed {} must be positive", self.travel_speed)));
        }
        self.engine.validate().map_err(|e| SimError::Config(e.to_string()))
    }
}
