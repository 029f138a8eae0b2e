//! `hm-sim` — agent tick loop and simulation driver for the hurricane_dt
//! engine.
//!
//! # Two-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Arrivals — travelling agents whose arrival tick has come appear at
//!                their destination AOI.
//!   ② Intents  — every MobilityAgent::step runs concurrently (join_all)
//!                against a shared &World; moves are buffered.
//!   ③ Apply    — buffered moves start, in ascending AgentId order.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`agent`]    | `MobilityAgent`, `TickOutcome`, `StayReason`               |
//! | [`world`]    | `World` (in-memory environment), `WeatherTimeline`         |
//! | [`sim`]      | `Sim` and its tick loop                                    |
//! | [`builder`]  | `SimBuilder`                                               |
//! | [`scenario`] | `ScenarioConfig` — every tunable of a run                  |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `TickSummary`               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hm_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(map, service).agents(setups).build()?;
//! let reports = sim.run(&mut NoopObserver).await;
//! ```

pub mod agent;
pub mod builder;
pub mod error;
pub mod observer;
pub mod scenario;
pub mod sim;
pub mod world;

#[cfg(test)]
mod tests;

pub use agent::{MobilityAgent, StayReason, StepReport, TickOutcome};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use scenario::ScenarioConfig;
pub use sim::Sim;
pub use world::{Departure, WeatherTimeline, World};
