use hm_core::{AgentId, AoiId};
use hm_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("{agent} cannot be placed at unknown {aoi}")]
    UnknownPlacement { agent: AgentId, aoi: AoiId },

    #[error("{agent} has {anchor} anchor {aoi}, which is not on the map")]
    UnknownAnchor {
        agent:  AgentId,
        anchor: &'static str,
        aoi:    AoiId,
    },

    #[error("map error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
