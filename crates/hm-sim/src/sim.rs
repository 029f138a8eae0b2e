//! The `Sim` struct and its tick loop.

use futures::future::join_all;
use hm_behavior::TextCompletionService;
use hm_core::{SimClock, SimConfig};
use hm_telemetry::FinalReport;
use tracing::{debug, info};

use crate::agent::{MobilityAgent, StayReason, TickOutcome};
use crate::{SimObserver, TickSummary, World};

/// The main simulation runner.
///
/// `Sim<S>` holds the world, every agent and the shared completion service,
/// and drives the two-phase tick loop:
///
/// 1. **Arrivals**: travelling agents whose arrival tick has come appear at
///    their destination AOI.
/// 2. **Intent phase** (concurrent): every agent runs its decision step
///    against a shared `&World`.  Movement commands are only buffered.
/// 3. **Apply phase** (sequential, ascending `AgentId` for determinism):
///    buffered moves start travelling.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: TextCompletionService> {
    pub config:     SimConfig,
    pub clock:      SimClock,
    pub world:      World,
    pub agents:     Vec<MobilityAgent>,
    pub completion: S,
}

impl<S: TextCompletionService> Sim<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`, then close the last
    /// day and return one final report per agent.
    pub async fn run<O: SimObserver>(&mut self, observer: &mut O) -> Vec<FinalReport> {
        while self.clock.current_tick < self.config.end_tick() {
            self.process_tick(observer).await;
            self.clock.advance();
        }
        self.finish(observer)
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub async fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.process_tick(observer).await;
            self.clock.advance();
        }
    }

    /// Roll up each agent's current day and collect the final reports.
    pub fn finish<O: SimObserver>(&mut self, observer: &mut O) -> Vec<FinalReport> {
        let mut reports = Vec::with_capacity(self.agents.len());
        for agent in &mut self.agents {
            let (rollup, report) = agent.finish();
            if let Some(daily) = rollup {
                observer.on_day_end(agent.id(), &daily);
            }
            reports.push(report);
        }
        let final_tick = self.clock.current_tick;
        info!(final_tick, agents = reports.len(), "simulation finished");
        observer.on_sim_end(final_tick, &reports);
        reports
    }

    // ── Core tick processing ──────────────────────────────────────────────

    async fn process_tick<O: SimObserver>(&mut self, observer: &mut O) {
        let tick = self.clock.current_tick;
        let now = self.clock.now();
        observer.on_tick_start(tick, now);
        self.world.set_time(tick, now);

        // ── Phase 1: arrivals ─────────────────────────────────────────────
        let arrivals = self.world.tick_arrivals(tick);
        for (agent, aoi) in &arrivals {
            debug!(%agent, %aoi, tick, "arrived");
        }

        // ── Phase 2: intent phase (produce) ───────────────────────────────
        //
        // Agents only read the world; movement commands land in its
        // pending buffer.
        let world = &self.world;
        let completion = &self.completion;
        let reports = join_all(self.agents.iter_mut().map(move |agent| agent.step(world, completion))).await;

        // ── Phase 3: apply phase (consume) ────────────────────────────────
        let departures = self.world.apply_moves(tick);

        let mut summary = TickSummary {
            tick,
            now,
            arrivals: arrivals.len(),
            departures: departures.len(),
            ..TickSummary::default()
        };
        for report in &reports {
            match report.outcome {
                TickOutcome::Travel { .. } => summary.travels += 1,
                TickOutcome::EnRoute => summary.en_route += 1,
                TickOutcome::Stay(reason) => {
                    summary.stays += 1;
                    if matches!(reason, StayReason::Rejected(_)) {
                        summary.rejections += 1;
                    }
                }
            }
            if report.violation.is_some() {
                summary.violations += 1;
            }
            if let Some(change) = report.phase_change {
                observer.on_phase_change(report.agent, change);
            }
            if let Some(daily) = &report.rollup {
                observer.on_day_end(report.agent, daily);
            }
        }
        observer.on_tick_end(&summary);
    }
}
