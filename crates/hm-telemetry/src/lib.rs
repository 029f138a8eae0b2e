//! `hm-telemetry` — per-agent trip ledger and validation metrics.
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`event`]      | `TravelEvent` — one approved departure                       |
//! | [`ledger`]     | `TelemetryLedger`, `Counters` and the counter invariant      |
//! | [`validation`] | change rate, hourly distribution, KL divergence              |
//! | [`report`]     | `DailyReport`, `FinalReport`, `PopulationReport`             |
//! | [`config`]     | `TelemetryConfig` — targets, reference, plausible ranges     |
//! | [`error`]      | `TelemetryError`, `TelemetryResult<T>`                       |
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut ledger = TelemetryLedger::new(Arc::new(TelemetryConfig::default()));
//! ledger.record(event)?;
//! let daily = ledger.daily_rollup(day, phase);
//! println!("{daily}");
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod report;
pub mod validation;

#[cfg(test)]
mod tests;

pub use config::TelemetryConfig;
pub use error::{TelemetryError, TelemetryResult};
pub use event::TravelEvent;
pub use ledger::{Counters, TelemetryLedger};
pub use report::{DailyReport, FinalReport, PhaseSummary, PopulationReport};
pub use validation::{ValidationEntry, kl_divergence};
