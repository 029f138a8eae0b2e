use hm_core::{Activity, AoiId, Phase};
use serde::{Deserialize, Serialize};

/// One approved departure.  Appended to the ledger and never modified.
///
/// `phase` is the regime in force when the trip was approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEvent {
    pub day:      u64,
    pub hour:     u8,
    pub from:     Option<AoiId>,
    pub to:       AoiId,
    pub activity: Activity,
    pub phase:    Phase,
}
