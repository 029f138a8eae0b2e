//! Simulation observer trait for progress reporting and data collection.

use hm_behavior::PhaseChange;
use hm_core::{AgentId, SimTime};
use hm_telemetry::{DailyReport, FinalReport};

/// Aggregate of one tick, passed to [`SimObserver::on_tick_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick:       u64,
    pub now:        SimTime,
    pub travels:    usize,
    pub stays:      usize,
    pub en_route:   usize,
    /// Stays caused by the duplicate guard.
    pub rejections: usize,
    pub arrivals:   usize,
    /// Moves the world accepted in the apply phase.
    pub departures: usize,
    pub violations: usize,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_day_end(&mut self, agent: AgentId, report: &DailyReport) {
///         println!("{agent}: {report}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before arrivals land.
    fn on_tick_start(&mut self, _tick: u64, _now: SimTime) {}

    /// Called after the apply phase of each tick.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    fn on_phase_change(&mut self, _agent: AgentId, _change: PhaseChange) {}

    /// Called once per agent for every completed simulated day.
    fn on_day_end(&mut self, _agent: AgentId, _report: &DailyReport) {}

    /// Called once after the final tick, with one report per agent in
    /// agent order.
    fn on_sim_end(&mut self, _final_tick: u64, _reports: &[FinalReport]) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
