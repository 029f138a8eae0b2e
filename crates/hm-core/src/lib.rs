//! `hm-core` — foundational types for the `hurricane_dt` mobility engine.
//!
//! This crate is a dependency of every other `hm-*` crate.  It intentionally
//! has no `hm-*` dependencies and minimal external ones (`rand`, `thiserror`
//! and `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `AoiId`, `PoiId`                           |
//! | [`geo`]         | `XyPoint`, planar Euclidean distance                  |
//! | [`time`]        | `SimTime`, `SimClock`, `SimConfig`                    |
//! | [`rng`]         | `AgentRng`: per-agent deterministic randomness        |
//! | [`phase`]       | `Phase` regime enum, `PerPhase<T>` table              |
//! | [`activity`]    | `Activity` closed enum and `TimeSlot`                 |
//! | [`error`]       | `HmError`, `HmResult`                                 |

pub mod activity;
pub mod error;
pub mod geo;
pub mod ids;
pub mod phase;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use activity::{Activity, TimeSlot};
pub use error::{HmError, HmResult};
pub use geo::XyPoint;
pub use ids::{AgentId, AoiId, PoiId};
pub use phase::{PerPhase, Phase};
pub use rng::AgentRng;
pub use time::{SimClock, SimConfig, SimTime};
