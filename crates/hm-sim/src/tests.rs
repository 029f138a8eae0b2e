//! Integration tests for hm-sim.

use std::sync::Arc;

use hm_behavior::{AgentSetup, EngineConfig, Profile};
use hm_core::{Activity, AgentId, AoiId, PerPhase, SimTime, XyPoint};
use hm_llm::ScriptedCompletion;
use hm_spatial::{PoiMap, PoiMapBuilder};
use hm_telemetry::TelemetryConfig;

use crate::{MobilityAgent, WeatherTimeline, World};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOME: AoiId = AoiId(1);
const WORK: AoiId = AoiId(2);
const MALL: AoiId = AoiId(3);
const SHOP: AoiId = AoiId(4);

/// Four AOIs on a line: home at 0, mall at 1000, shop at 2000, work at 3000.
fn town() -> PoiMap {
    let mut b = PoiMapBuilder::new();
    b.add_aoi(HOME, XyPoint::new(0.0, 0.0)).unwrap();
    b.add_aoi(WORK, XyPoint::new(3_000.0, 0.0)).unwrap();
    b.add_aoi(MALL, XyPoint::new(1_000.0, 0.0)).unwrap();
    b.add_aoi(SHOP, XyPoint::new(2_000.0, 0.0)).unwrap();
    b.add_poi(WORK, "Office Park", "office").unwrap();
    b.add_poi(MALL, "Bayside Mall", "mall").unwrap();
    b.add_poi(SHOP, "Corner Store", "shopping").unwrap();
    b.add_poi(SHOP, "Harbor Diner", "restaurant").unwrap();
    b.build()
}

fn setup(work: Option<AoiId>) -> AgentSetup {
    AgentSetup { profile: Profile::default(), home: Some(HOME), work }
}

/// Always admits travel and always picks `backup`.
fn eager_config(backup: Activity) -> EngineConfig {
    let mut c = EngineConfig::default();
    c.tables.hourly = PerPhase::from_fn(|_| vec![0.5; 24]);
    c.tables.propensity = PerPhase::new(100.0, 100.0, 100.0);
    c.tables.stage2_threshold = 1.0;
    c.tables.backup = PerPhase::from_fn(|_| vec![backup]);
    c
}

fn agent(config: EngineConfig, work: Option<AoiId>) -> MobilityAgent {
    MobilityAgent::new(
        AgentId(0),
        7,
        setup(work),
        Arc::new(config),
        Arc::new(TelemetryConfig::default()),
    )
}

fn world(speed: f64) -> World {
    let mut w = World::new(town(), WeatherTimeline::new("sunny"), 900, speed);
    w.place(HOME).unwrap();
    w
}

// ── World ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world_tests {
    use hm_behavior::{MovementActuator, PositionSource, TimeSource, WeatherSource};

    use super::*;
    use crate::SimError;

    #[test]
    fn weather_timeline_is_piecewise() {
        let t = WeatherTimeline::new("sunny")
            .then(SimTime(7_200), "after the storm")
            .then(SimTime(3_600), "hurricane landfall");
        assert_eq!(t.at(SimTime(0)), "sunny");
        assert_eq!(t.at(SimTime(3_599)), "sunny");
        assert_eq!(t.at(SimTime(3_600)), "hurricane landfall");
        assert_eq!(t.at(SimTime(90_000)), "after the storm");
    }

    #[test]
    fn unknown_placement_errors() {
        let mut w = World::new(town(), WeatherTimeline::new("sunny"), 900, 10.0);
        assert!(matches!(
            w.place(AoiId(99)),
            Err(SimError::UnknownPlacement { aoi: AoiId(99), .. })
        ));
    }

    #[test]
    fn capabilities_reflect_state() {
        let mut w = world(10.0);
        w.set_time(4, SimTime(3_600));
        assert_eq!(w.now(), SimTime(3_600));
        assert_eq!(w.current_aoi(AgentId(0)), Some(HOME));
        assert_eq!(w.position(AgentId(0)), Some(XyPoint::new(0.0, 0.0)));
        assert_eq!(w.current_aoi(AgentId(5)), None);
        assert_eq!(w.weather(), "sunny");
    }

    #[test]
    fn teleport_at_arrival() {
        // 2000 units at 1 unit/s = 2000 s = 3 ticks of 900 s.
        let mut w = world(1.0);
        w.move_to(AgentId(0), SHOP);
        let departures = w.apply_moves(0);
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].from, Some(HOME));
        assert_eq!(departures[0].arrival_tick, 3);
        assert!(w.in_transit(AgentId(0)));
        assert_eq!(w.current_aoi(AgentId(0)), None);
        assert_eq!(w.position(AgentId(0)), Some(XyPoint::new(0.0, 0.0)));

        assert!(w.tick_arrivals(2).is_empty());
        assert_eq!(w.tick_arrivals(3), vec![(AgentId(0), SHOP)]);
        assert_eq!(w.current_aoi(AgentId(0)), Some(SHOP));
        assert_eq!(w.position(AgentId(0)), Some(XyPoint::new(2_000.0, 0.0)));
    }

    #[test]
    fn short_trips_take_one_tick() {
        let mut w = world(1_000_000.0);
        w.move_to(AgentId(0), MALL);
        assert_eq!(w.apply_moves(10)[0].arrival_tick, 11);
    }

    #[test]
    fn moves_apply_in_agent_order() {
        let mut w = world(10.0);
        w.place(WORK).unwrap();
        w.move_to(AgentId(1), SHOP);
        w.move_to(AgentId(0), MALL);
        let order: Vec<AgentId> = w.apply_moves(0).iter().map(|d| d.agent).collect();
        assert_eq!(order, vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn invalid_moves_are_dropped() {
        let mut w = world(10.0);
        w.move_to(AgentId(0), AoiId(99));
        w.move_to(AgentId(3), MALL);
        assert!(w.apply_moves(0).is_empty());

        w.move_to(AgentId(0), MALL);
        w.apply_moves(1);
        w.move_to(AgentId(0), SHOP);
        assert!(w.apply_moves(1).is_empty(), "already in transit");
    }
}

// ── MobilityAgent ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod agent_tests {
    use hm_behavior::{GuardRejection, PhaseChange};
    use hm_core::Phase;

    use super::*;
    use crate::{StayReason, TickOutcome};

    #[tokio::test]
    async fn travels_to_nearest_match() {
        let w = world(10.0);
        let service = ScriptedCompletion::always("Normal");
        let mut a = agent(eager_config(Activity::Shopping), None);

        let report = a.step(&w, &service).await;
        assert_eq!(report.outcome, TickOutcome::Travel { activity: Activity::Shopping, destination: MALL });
        assert!(a.gate().is_committed());
        assert_eq!(a.ledger().counters().total, 1);
        assert_eq!(a.ledger().events()[0].from, Some(HOME));
        assert!(report.violation.is_none());
    }

    #[tokio::test]
    async fn committed_agent_is_en_route() {
        let mut w = world(1.0);
        let service = ScriptedCompletion::always("Normal");
        let mut a = agent(eager_config(Activity::Shopping), None);

        a.step(&w, &service).await;
        w.apply_moves(0);
        w.set_time(1, SimTime(900));
        w.tick_arrivals(1);
        let report = a.step(&w, &service).await;
        assert_eq!(report.outcome, TickOutcome::EnRoute);
        assert_eq!(a.ledger().counters().total, 1);
    }

    #[tokio::test]
    async fn arrival_completes_plan_then_guard_blocks_quick_retrip() {
        let mut w = world(10.0);
        let service = ScriptedCompletion::always("Normal");
        let mut a = agent(eager_config(Activity::Shopping), None);

        a.step(&w, &service).await;
        w.apply_moves(0);
        w.set_time(1, SimTime(900));
        assert_eq!(w.tick_arrivals(1), vec![(AgentId(0), MALL)]);

        let report = a.step(&w, &service).await;
        assert!(!a.gate().is_committed());
        assert!(a.recent().contains(MALL));
        assert_eq!(
            report.outcome,
            TickOutcome::Stay(StayReason::Rejected(GuardRejection::TooSoon { elapsed: 900 }))
        );
        assert_eq!(a.ledger().counters().duplicates, 1);
        assert_eq!(a.ledger().counters().total, 1);
    }

    #[tokio::test]
    async fn phase_change_clears_cooldowns() {
        let mut w = world(10.0);
        let service = ScriptedCompletion::always("During_Hurricane").then_reply("Normal");
        let mut a = agent(eager_config(Activity::Shopping), None);

        a.step(&w, &service).await;
        assert!(!a.guard().cooldowns().is_empty());
        w.apply_moves(0);
        w.set_time(4, SimTime(3_600));
        w.tick_arrivals(4);

        let report = a.step(&w, &service).await;
        assert_eq!(report.phase_change, Some(PhaseChange { from: Phase::Normal, to: Phase::During }));
        assert_eq!(a.phase(), Phase::During);
        // Without the reset the shopping cooldown (7200 s) would still hold.
        assert_eq!(report.outcome, TickOutcome::Travel { activity: Activity::Shopping, destination: SHOP });
        assert_eq!(a.ledger().events()[1].phase, Phase::During);
        assert_eq!(a.ledger().events()[1].from, Some(MALL));
    }

    #[tokio::test]
    async fn classifier_runs_at_most_hourly() {
        let mut w = world(10.0);
        let service = ScriptedCompletion::always("Normal");
        let mut a = agent(eager_config(Activity::Shopping), None);
        for tick in 0..4 {
            w.set_time(tick, SimTime(tick * 900));
            a.step(&w, &service).await;
        }
        assert_eq!(service.request_count(), 1);
    }

    #[tokio::test]
    async fn missing_anchor_means_no_destination() {
        let w = world(10.0);
        let service = ScriptedCompletion::always("Normal");
        let mut a = agent(eager_config(Activity::Work), None);
        let report = a.step(&w, &service).await;
        assert_eq!(report.outcome, TickOutcome::Stay(StayReason::NoDestination(Activity::Work)));
        assert_eq!(a.ledger().counters().total, 0);
    }

    #[tokio::test]
    async fn unmapped_work_anchor_is_a_stay() {
        let mut w = world(10.0);
        let service = ScriptedCompletion::always("Normal");
        let mut a = agent(eager_config(Activity::Work), Some(AoiId(99)));
        for tick in 0..8 {
            w.set_time(tick, SimTime(tick * 900));
            let report = a.step(&w, &service).await;
            assert_eq!(report.outcome, TickOutcome::Stay(StayReason::NoDestination(Activity::Work)));
            w.apply_moves(tick);
        }
        assert!(!a.gate().is_committed());
        assert!(!w.in_transit(AgentId(0)));
        assert_eq!(a.ledger().counters().total, 0);
    }

    #[tokio::test]
    async fn zero_propensity_never_travels() {
        let mut w = world(10.0);
        let service = ScriptedCompletion::always("Normal");
        let mut config = eager_config(Activity::Shopping);
        config.tables.propensity = PerPhase::new(0.0, 0.0, 0.0);
        let mut a = agent(config, Some(WORK));
        for tick in 0..50 {
            w.set_time(tick, SimTime(tick * 900));
            let report = a.step(&w, &service).await;
            assert_eq!(report.outcome, TickOutcome::Stay(StayReason::NotAdmitted));
        }
    }

    #[tokio::test]
    async fn day_change_rolls_up_previous_day() {
        let mut w = world(10.0);
        let service = ScriptedCompletion::always("Normal");
        let mut a = agent(eager_config(Activity::Shopping), None);

        a.step(&w, &service).await;
        w.apply_moves(0);
        w.set_time(96, SimTime::from_day_secs(1, 0));
        w.tick_arrivals(96);
        let report = a.step(&w, &service).await;
        let daily = report.rollup.unwrap();
        assert_eq!(daily.day, 0);
        assert_eq!(daily.count, 1);
        assert_eq!(a.ledger().baseline(), Some(1));

        let (last, summary) = a.finish();
        assert_eq!(last.unwrap().day, 1);
        assert!(summary.consistent);
    }

    #[tokio::test]
    async fn rollup_is_filed_under_the_new_phase() {
        let mut w = world(10.0);
        let service = ScriptedCompletion::always("After_Hurricane")
            .then_reply("Normal")
            .then_reply("During_Hurricane");
        let mut a = agent(eager_config(Activity::Shopping), None);

        for day in 0..3 {
            let tick = day * 96;
            w.set_time(tick, SimTime::from_day_secs(day, 0));
            w.tick_arrivals(tick);
            let report = a.step(&w, &service).await;
            w.apply_moves(tick);
            if day == 2 {
                let daily = report.rollup.unwrap();
                assert_eq!(daily.day, 1);
                assert_eq!(daily.phase, Phase::After);
            }
        }
        assert_eq!(a.ledger().series(Phase::During).len(), 0);
        assert_eq!(a.ledger().series(Phase::After).len(), 1);
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sim_tests {
    use hm_core::SimConfig;
    use hm_telemetry::{DailyReport, FinalReport, TravelEvent};

    use super::*;
    use crate::{NoopObserver, ScenarioConfig, SimBuilder, SimError, SimObserver, TickSummary};

    fn scenario(total_ticks: u64) -> ScenarioConfig {
        ScenarioConfig {
            sim: SimConfig { tick_duration_secs: 900, total_ticks, seed: 11 },
            ..ScenarioConfig::default()
        }
    }

    fn setups(n: usize) -> Vec<AgentSetup> {
        (0..n).map(|i| setup(if i % 2 == 0 { Some(WORK) } else { None })).collect()
    }

    #[derive(Default)]
    struct Recorder {
        ticks:       u64,
        agent_ticks: Vec<usize>,
        days:        Vec<(AgentId, u64)>,
        finals:      usize,
    }

    impl SimObserver for Recorder {
        fn on_tick_end(&mut self, summary: &TickSummary) {
            self.ticks += 1;
            self.agent_ticks.push(summary.travels + summary.stays + summary.en_route);
            assert_eq!(summary.travels, summary.departures);
        }

        fn on_day_end(&mut self, agent: AgentId, report: &DailyReport) {
            self.days.push((agent, report.day));
        }

        fn on_sim_end(&mut self, _final_tick: u64, reports: &[FinalReport]) {
            self.finals = reports.len();
        }
    }

    #[test]
    fn position_count_mismatch_errors() {
        let result = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
            .agents(setups(3))
            .initial_positions(vec![HOME; 2])
            .build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { expected: 3, got: 2, .. })));
    }

    #[test]
    fn homeless_agent_needs_a_position() {
        let result = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
            .agents(vec![AgentSetup::default()])
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));

        let ok = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
            .agents(vec![AgentSetup::default()])
            .initial_positions(vec![SHOP])
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn unmapped_anchor_rejected() {
        let result = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
            .agents(vec![setup(Some(WORK)), setup(Some(AoiId(99)))])
            .build();
        assert!(matches!(
            result,
            Err(SimError::UnknownAnchor { agent: AgentId(1), anchor: "work", aoi: AoiId(99) })
        ));

        let stray = AgentSetup { home: Some(AoiId(42)), ..AgentSetup::default() };
        let result = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
            .agents(vec![stray])
            .initial_positions(vec![HOME])
            .build();
        assert!(matches!(result, Err(SimError::UnknownAnchor { anchor: "home", .. })));
    }

    #[test]
    fn bad_tick_duration_rejected() {
        let mut s = scenario(10);
        s.sim.tick_duration_secs = 7;
        let result = SimBuilder::new(town(), ScriptedCompletion::always("Normal")).scenario(s).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn scenario_from_json() {
        let s = ScenarioConfig::from_json(r#"{"travel_speed": 5.0, "sim": {"seed": 3}}"#).unwrap();
        assert_eq!(s.travel_speed, 5.0);
        assert_eq!(s.sim.seed, 3);
        assert_eq!(s.sim.tick_duration_secs, 900);
        assert!(ScenarioConfig::from_json(r#"{"travel_speed": -1.0}"#).is_err());
        assert!(ScenarioConfig::from_json(r#"{"engine": {"resolver": {"max_candidates": 0}}}"#).is_err());
    }

    #[tokio::test]
    async fn two_day_run() {
        let mut sim = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
            .scenario(scenario(192))
            .agents(setups(4))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let reports = sim.run(&mut rec).await;

        assert_eq!(rec.ticks, 192);
        assert!(rec.agent_ticks.iter().all(|&n| n == 4), "one outcome per agent per tick");
        assert_eq!(rec.days.len(), 8);
        assert!(rec.days.iter().filter(|(_, d)| *d == 0).count() == 4);
        assert_eq!(rec.finals, 4);
        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|r| r.consistent));
        assert_eq!(sim.clock.current_tick, 192);
    }

    #[tokio::test]
    async fn trips_never_repeat_the_origin() {
        let mut s = scenario(96);
        s.engine = eager_config(Activity::Shopping);
        let mut sim = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
            .scenario(s)
            .agents(setups(2))
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).await;
        for agent in &sim.agents {
            let events = agent.ledger().events();
            assert!(!events.is_empty());
            assert!(events.iter().all(|e| e.from != Some(e.to)));
        }
    }

    #[tokio::test]
    async fn same_seed_same_trips() {
        async fn trips() -> Vec<Vec<TravelEvent>> {
            let mut s = scenario(96);
            s.engine = eager_config(Activity::Shopping);
            let mut sim = SimBuilder::new(town(), ScriptedCompletion::always("Normal"))
                .scenario(s)
                .agents(setups(3))
                .build()
                .unwrap();
            sim.run(&mut NoopObserver).await;
            sim.agents.iter().map(|a| a.ledger().events().to_vec()).collect()
        }
        assert_eq!(trips().await, trips().await);
    }
}
