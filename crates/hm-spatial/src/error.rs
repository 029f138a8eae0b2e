//! Spatial-subsystem error type.

use thiserror::Error;

use hm_core::AoiId;

/// Errors produced by `hm-spatial` while assembling a [`PoiMap`](crate::PoiMap).
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("{0} is not a usable AOI id")]
    InvalidAoi(AoiId),

    #[error("{0} registered twice")]
    DuplicateAoi(AoiId),

    #[error("POI {name:?} references unregistered {aoi}")]
    UnknownAoi { aoi: AoiId, name: String },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
