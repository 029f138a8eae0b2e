//! Planar map coordinates.
//!
//! The city map uses a projected Cartesian frame measured in metres, so all
//! POI radius queries and "nearest venue" comparisons are plain Euclidean
//! distance.  No geodesic correction is needed at city scale.

/// A position in the projected map frame (metres).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct XyPoint {
    pub x: f64,
    pub y: f64,
}

impl XyPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.  Cheaper than [`distance`](Self::distance)
    /// when only an ordering is needed.
    #[inline]
    pub fn distance_2(self, other: XyPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance(self, other: XyPoint) -> f64 {
        self.distance_2(other).sqrt()
    }
}

impl std::fmt::Display for XyPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
