//! `hm-spatial` — points of interest and areas of interest.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`poi`]     | `Poi` record                                                |
//! | [`index`]   | `PoiIndex` trait — category-filtered radius queries         |
//! | [`map`]     | `PoiMap` (R-tree + AOI table), `PoiMapBuilder`              |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! Coordinates are planar metres ([`hm_core::XyPoint`]).  Every POI belongs
//! to exactly one AOI; trips are expressed as AOI targets, so the index
//! also answers "where is AOI n".

pub mod error;
pub mod index;
pub mod map;
pub mod poi;


pub use error::{SpatialError, SpatialResult};
pub use index::PoiIndex;
pub use map::{PoiMap, PoiMapBuilder};
pub use poi::Poi;
