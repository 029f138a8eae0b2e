//! gulf_coast — three simulated days of a coastal city living through a
//! hurricane.
//!
//! Day 0 is ordinary weather, day 1 brings landfall, day 2 is the
//! recovery.  Twelve residents decide every 15 minutes whether and where to
//! travel.  The completion service is answered offline so the demo runs
//! without network access.
//!
//! Set `RUST_LOG=debug` to follow individual decisions.

mod city;
mod offline;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use hm_behavior::load_profiles_reader;
use hm_core::{AgentId, SimConfig, SimTime};
use hm_sim::{ScenarioConfig, SimBuilder, SimObserver, TickSummary, WeatherTimeline};
use hm_telemetry::{DailyReport, FinalReport, PopulationReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

use city::build_city;
use offline::OfflineCompletion;

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:        usize = 12;
const SEED:               u64   = 114_514;
const TICK_DURATION_SECS: u32   = 900; // 1 tick = 15 minutes
const SIM_DAYS:           u64   = 3;
const OUTPUT_DIR:         &str  = "output/gulf_coast";

// ── Profiles CSV ──────────────────────────────────────────────────────────────

// Homes are the four neighbourhoods in city::NEIGHBOURHOODS; two agents
// have no workplace.
const PROFILES_CSV: &str = "\
agent_id,age,income,education,gender,home_aoi,work_aoi\n\
0,23,28000,high_school,female,500000001,500000010\n\
1,34,62000,bachelor,male,500000001,500000011\n\
2,41,91000,master,female,500000002,500000010\n\
3,67,38000,bachelor,male,500000002,\n\
4,29,54000,phd,other,500000003,500000011\n\
5,52,76000,bachelor,female,500000003,500000010\n\
6,19,15000,high_school,male,500000004,500000011\n\
7,72,44000,master,female,500000004,\n\
8,38,120000,phd,male,500000001,500000010\n\
9,45,33000,high_school,female,500000002,500000011\n\
10,31,58000,bachelor,male,500000003,500000010\n\
11,26,47000,master,female,500000004,500000011\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RunLog {
    travels:    usize,
    rejections: usize,
    violations: usize,
    days:       Vec<(AgentId, DailyReport)>,
}

impl SimObserver for RunLog {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.travels += summary.travels;
        self.rejections += summary.rejections;
        self.violations += summary.violations;
        if summary.tick % 24 == 0 {
            info!(
                tick = summary.tick,
                time = %summary.now,
                travels = self.travels,
                rejections = self.rejections,
                "progress"
            );
        }
    }

    fn on_day_end(&mut self, agent: AgentId, report: &DailyReport) {
        self.days.push((agent, report.clone()));
    }

    fn on_sim_end(&mut self, final_tick: u64, reports: &[FinalReport]) {
        info!(final_tick, agents = reports.len(), violations = self.violations, "run complete");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== gulf_coast — hurricane mobility demo ===");
    println!("Agents: {AGENT_COUNT}  |  Days: {SIM_DAYS}  |  Seed: {SEED}");
    println!();

    // 1. City map.
    let map = build_city()?;
    println!("City: {} AOIs, {} POIs", map.aoi_count(), map.poi_count());

    // 2. Residents.
    let setups = load_profiles_reader(Cursor::new(PROFILES_CSV), AGENT_COUNT)?;
    println!("Loaded {} resident profiles", setups.len());

    // 3. Weather: calm, landfall, recovery.
    let weather = WeatherTimeline::new("Sunny, light breeze from the gulf")
        .then(SimTime::from_day_secs(1, 0), "Hurricane landfall, storm surge warning, winds 110 mph")
        .then(SimTime::from_day_secs(2, 0), "Hurricane has passed; recovery under way, scattered outages");

    // 4. Scenario.
    let scenario = ScenarioConfig {
        sim: SimConfig {
            tick_duration_secs: TICK_DURATION_SECS,
            total_ticks:        SIM_DAYS * 86_400 / TICK_DURATION_SECS as u64,
            seed:               SEED,
        },
        ..ScenarioConfig::default()
    };
    println!("Sim: {} ticks of {} s", scenario.sim.total_ticks, TICK_DURATION_SECS);
    println!();

    let mut sim = SimBuilder::new(map, OfflineCompletion)
        .scenario(scenario)
        .weather(weather)
        .agents(setups)
        .build()?;

    // 5. Run.
    let mut log = RunLog::default();
    let t0 = Instant::now();
    let reports = sim.run(&mut log).await;
    let elapsed = t0.elapsed();

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!();
    for (agent, day) in log.days.iter().filter(|(a, _)| a.0 < 2) {
        println!("{agent} {day}");
    }
    for (i, report) in reports.iter().enumerate().take(2) {
        println!("AgentId({i}) final\n{report}");
    }
    let population = PopulationReport::from_reports(&reports);
    println!("{population}");

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let path = Path::new(OUTPUT_DIR).join("summary.json");
    let summary = serde_json::json!({
        "population": population,
        "agents": reports,
    });
    std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
    println!("Summary written to {}", path.display());

    Ok(())
}
