//! Query seam between the decision engine and whatever holds the map.
//!
//! The engine only ever asks two questions: which venues of some categories
//! lie within a radius, and where an AOI is.  [`PoiMap`](crate::PoiMap) is
//! the in-memory answer; a host simulator can implement the trait over its
//! own map representation.

use hm_core::{AoiId, XyPoint};

use crate::Poi;

pub trait PoiIndex: Send + Sync {
    /// POIs within `radius` metres of `center` whose category is one of
    /// `categories`, ordered by ascending distance.
    ///
    /// An empty `categories` slice matches nothing.
    fn nearby(&self, center: XyPoint, radius: f64, categories: &[&str]) -> Vec<Poi>;

    /// Representative position of `aoi`, or `None` if it is unknown.
    fn aoi_position(&self, aoi: AoiId) -> Option<XyPoint>;
}
