use hm_core::{AoiId, PoiId, XyPoint};
use serde::{Deserialize, Serialize};

/// A named venue inside an AOI.
///
/// `category` is a free-form lowercase tag (`"supermarket"`, `"park"`, ...)
/// matched exactly against the category lists of the activity resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id:       PoiId,
    pub aoi:      AoiId,
    pub name:     String,
    pub category: String,
    pub position: XyPoint,
}
