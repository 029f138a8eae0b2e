//! In-memory POI map.
//!
//! # Data layout
//!
//! POIs live in a dense `Vec<Poi>` indexed by `PoiId`.  An R-tree (via
//! `rstar`) over `[x, y]` points maps positions back to POI indices, so a
//! radius query is a single `locate_within_distance` walk followed by a
//! category filter.  AOI centres sit in a separate lookup table.

use std::collections::HashMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use hm_core::{AoiId, PoiId, XyPoint};

use crate::{Poi, PoiIndex, SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct PoiEntry {
    point: [f64; 2],
    idx:   usize,
}

impl RTreeObject for PoiEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PoiEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── PoiMap ────────────────────────────────────────────────────────────────────

/// Immutable POI/AOI map.  Construct with [`PoiMapBuilder`].
pub struct PoiMap {
    pois:        Vec<Poi>,
    aoi_pos:     HashMap<AoiId, XyPoint>,
    spatial_idx: RTree<PoiEntry>,
}

impl PoiMap {
    pub fn poi_count(&self) -> usize {
        self.pois.len()
    }

    pub fn aoi_count(&self) -> usize {
        self.aoi_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

impl PoiIndex for PoiMap {
    fn nearby(&self, center: XyPoint, radius: f64, categories: &[&str]) -> Vec<Poi> {
        if categories.is_empty() || !(radius >= 0.0) {
            return Vec::new();
        }
        let mut hits: Vec<(f64, usize)> = self
            .spatial_idx
            .locate_within_distance([center.x, center.y], radius * radius)
            .filter(|e| categories.contains(&self.pois[e.idx].category.as_str()))
            .map(|e| (e.distance_2(&[center.x, center.y]), e.idx))
            .collect();
        // Ties broken by PoiId so results do not depend on tree shape.
        hits.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, i)| self.pois[i].clone()).collect()
    }

    fn aoi_position(&self, aoi: AoiId) -> Option<XyPoint> {
        self.aoi_pos.get(&aoi).copied()
    }
}

// ── PoiMapBuilder ─────────────────────────────────────────────────────────────

/// Construct a [`PoiMap`] incrementally, then call [`build`](Self::build).
///
/// AOIs must be registered before the POIs that reference them.
///
/// # Example
///
/// ```
/// use hm_core::{AoiId, XyPoint};
/// use hm_spatial::{PoiIndex, PoiMapBuilder};
///
/// let mut b = PoiMapBuilder::new();
/// b.add_aoi(AoiId(1), XyPoint::new(0.0, 0.0)).unwrap();
/// b.add_poi(AoiId(1), "Corner Market", "supermarket").unwrap();
/// let map = b.build();
/// assert_eq!(map.nearby(XyPoint::new(10.0, 0.0), 100.0, &["supermarket"]).len(), 1);
/// ```
#[derive(Default)]
pub struct PoiMapBuilder {
    pois:    Vec<Poi>,
    aoi_pos: HashMap<AoiId, XyPoint>,
}

impl PoiMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an AOI centred at `pos`.
    pub fn add_aoi(&mut self, id: AoiId, pos: XyPoint) -> SpatialResult<()> {
        if !id.is_valid() {
            return Err(SpatialError::InvalidAoi(id));
        }
        if self.aoi_pos.insert(id, pos).is_some() {
            return Err(SpatialError::DuplicateAoi(id));
        }
        Ok(())
    }

    /// Add a POI located at its AOI's centre.
    pub fn add_poi(&mut self, aoi: AoiId, name: &str, category: &str) -> SpatialResult<PoiId> {
        let pos = self.aoi_pos.get(&aoi).copied().ok_or_else(|| SpatialError::UnknownAoi {
            aoi,
            name: name.to_owned(),
        })?;
        self.add_poi_at(aoi, name, category, pos)
    }

    /// Add a POI at an explicit position inside `aoi`.
    pub fn add_poi_at(
        &mut self,
        aoi: AoiId,
        name: &str,
        category: &str,
        position: XyPoint,
    ) -> SpatialResult<PoiId> {
        if !self.aoi_pos.contains_key(&aoi) {
            return Err(SpatialError::UnknownAoi { aoi, name: name.to_owned() });
        }
        let id = PoiId(self.pois.len() as u32);
        self.pois.push(Poi {
            id,
            aoi,
            name: name.to_owned(),
            category: category.to_owned(),
            position,
        });
        Ok(id)
    }

    pub fn poi_count(&self) -> usize {
        self.pois.len()
    }

    /// Consume the builder; bulk-loads the R-tree.
    pub fn build(self) -> PoiMap {
        let entries: Vec<PoiEntry> = self
            .pois
            .iter()
            .enumerate()
            .map(|(idx, p)| PoiEntry { point: [p.position.x, p.position.y], idx })
            .collect();
        PoiMap {
            pois:        self.pois,
            aoi_pos:     self.aoi_pos,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}
