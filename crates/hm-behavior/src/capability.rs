//! Capabilities the decision engine consumes from its host.
//!
//! The engine never reaches into a concrete simulator.  It reads time,
//! position and weather, queries POIs, and issues movement commands through
//! these traits only.  All of them take `&self` and must be safe to call
//! from many agents stepping concurrently.

use hm_core::{AgentId, AoiId, SimTime, XyPoint};

pub use hm_llm::TextCompletionService;
pub use hm_spatial::PoiIndex;

pub trait TimeSource: Send + Sync {
    fn now(&self) -> SimTime;
}

/// Where an agent currently is, as last observed.
pub trait PositionSource: Send + Sync {
    /// AOI the agent is inside, `None` while it is between AOIs.
    fn current_aoi(&self, agent: AgentId) -> Option<AoiId>;

    fn position(&self, agent: AgentId) -> Option<XyPoint>;
}

/// Free-text description of current conditions.
pub trait WeatherSource: Send + Sync {
    fn weather(&self) -> String;
}

/// Fire-and-forget movement command.
///
/// Arrival is never acknowledged; the engine detects it on a later tick by
/// comparing the observed AOI with its committed destination.
pub trait MovementActuator: Send + Sync {
    fn move_to(&self, agent: AgentId, destination: AoiId);
}

/// Everything an agent step needs from the environment.
pub trait Environment: TimeSource + PositionSource + WeatherSource + PoiIndex + MovementActuator {}

impl<T> Environment for T where T: TimeSource + PositionSource + WeatherSource + PoiIndex + MovementActuator {}
