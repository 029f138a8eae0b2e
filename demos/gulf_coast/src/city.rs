//! Synthetic coastal city.
//!
//! Coordinates are metres on a local plane; downtown sits near the origin
//! and the neighbourhoods spread inland along the x axis.

use hm_core::{AoiId, XyPoint};
use hm_spatial::{PoiMap, PoiMapBuilder, SpatialResult};

/// Residential AOIs, in the order profiles refer to them.
pub const NEIGHBOURHOODS: [AoiId; 4] = [AoiId(500_000_001), AoiId(500_000_002), AoiId(500_000_003), AoiId(500_000_004)];

/// Workplace AOIs.
pub const WORKPLACES: [AoiId; 2] = [AoiId(500_000_010), AoiId(500_000_011)];

/// `(aoi, x, y, [(name, category)])` for every non-residential AOI.
const VENUES: &[(u32, f64, f64, &[(&str, &str)])] = &[
    (500_000_010, 0.0, 0.0, &[("Port Authority Offices", "office")]),
    (500_000_011, 4_200.0, 1_500.0, &[("Commerce Park", "office")]),
    (500_000_020, 600.0, 300.0, &[("Dauphin St Diner", "restaurant"), ("Bienville Cafe", "cafe")]),
    (500_000_021, 1_800.0, -900.0, &[("Quick Burger", "fast_food"), ("Harbor Oyster Bar", "bar")]),
    (500_000_022, 3_000.0, 2_400.0, &[("Bel Air Mall", "mall"), ("Gulf Cinema 12", "cinema")]),
    (500_000_023, 2_500.0, -2_000.0, &[("Corner Grocery", "grocery"), ("Fresh Market", "supermarket")]),
    (500_000_024, 5_500.0, 500.0, &[("Westside Supermarket", "supermarket"), ("Rx Pharmacy", "pharmacy")]),
    (500_000_025, 1_200.0, 2_600.0, &[("Providence Hospital", "hospital")]),
    (500_000_026, 6_800.0, -1_200.0, &[("Family Clinic", "clinic"), ("Bay Dental", "dentist")]),
    (500_000_027, -500.0, 1_400.0, &[("Bienville Square", "park"), ("Saenger Theatre", "theater")]),
    (500_000_028, 3_900.0, -3_100.0, &[("Iron Gym", "gym"), ("Three Mile Creek Trail", "trail")]),
    (500_000_029, 700.0, -1_600.0, &[("First Gulf Bank", "bank"), ("Main Post Office", "post_office")]),
    (500_000_030, 2_200.0, 3_800.0, &[("Cathedral Basilica", "church")]),
    (500_000_031, 5_100.0, 3_300.0, &[("Oakleigh Salon", "beauty_salon"), ("Classic Barber", "barber")]),
    (500_000_032, -1_300.0, -400.0, &[("History Museum", "museum"), ("USS Alabama Park", "tourist_attraction")]),
    (500_000_033, 300.0, 900.0, &[("Lower Dauphin Club", "club"), ("Bayfront Plaza", "plaza")]),
];

const HOMES: [(f64, f64); 4] = [(-2_000.0, 3_000.0), (3_500.0, 4_800.0), (6_000.0, -2_500.0), (1_000.0, -4_000.0)];

pub fn build_city() -> SpatialResult<PoiMap> {
    let mut b = PoiMapBuilder::new();
    for (aoi, (x, y)) in NEIGHBOURHOODS.iter().zip(HOMES) {
        b.add_aoi(*aoi, XyPoint::new(x, y))?;
    }
    for &(id, x, y, pois) in VENUES {
        let aoi = AoiId(id);
        b.add_aoi(aoi, XyPoint::new(x, y))?;
        for &(name, category) in pois {
            b.add_poi(aoi, name, category)?;
        }
    }
    Ok(b.build())
}
