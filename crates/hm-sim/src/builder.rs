//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use hm_behavior::{AgentSetup, TextCompletionService};
use hm_core::{AgentId, AoiId};
use hm_spatial::{PoiIndex, PoiMap};

use crate::{MobilityAgent, ScenarioConfig, Sim, SimError, SimResult, WeatherTimeline, World};

/// Fluent builder for [`Sim<S>`].
///
/// # Required inputs
///
/// - [`PoiMap`] — AOIs and POIs the agents move between
/// - `S: TextCompletionService` — shared by every agent
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                         |
/// |--------------------------|---------------------------------|
/// | `.scenario(c)`           | `ScenarioConfig::default()`     |
/// | `.weather(w)`            | constant `"clear skies"`        |
/// | `.agents(v)`             | no agents                       |
/// | `.initial_positions(v)`  | each agent's home AOI           |
///
/// # Example
///
/// ```rust,ignore
/// let setups = load_profiles_csv(Path::new("profiles.csv"), 100)?;
/// let mut sim = SimBuilder::new(map, service)
///     .scenario(scenario)
///     .weather(timeline)
///     .agents(setups)
///     .build()?;
/// let reports = sim.run(&mut NoopObserver).await;
/// ```
pub struct SimBuilder<S: TextCompletionService> {
    map:        PoiMap,
    completion: S,
    scenario:   ScenarioConfig,
    weather:    WeatherTimeline,
    setups:     Vec<AgentSetup>,
    positions:  Option<Vec<AoiId>>,
}

impl<S: TextCompletionService> SimBuilder<S> {
    pub fn new(map: PoiMap, completion: S) -> Self {
        Self {
            map,
            completion,
            scenario:  ScenarioConfig::default(),
            weather:   WeatherTimeline::new("clear skies"),
            setups:    Vec::new(),
            positions: None,
        }
    }

    pub fn scenario(mut self, scenario: ScenarioConfig) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn weather(mut self, weather: WeatherTimeline) -> Self {
        self.weather = weather;
        self
    }

    /// One setup per agent; agent ids follow the vector order.
    pub fn agents(mut self, setups: Vec<AgentSetup>) -> Self {
        self.setups = setups;
        self
    }

    /// Starting AOI of each agent (must match the number of setups).
    ///
    /// If not called, agents start at home and an agent without a home is
    /// an error.
    pub fn initial_positions(mut self, positions: Vec<AoiId>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Validate inputs, place every agent, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<S>> {
        self.scenario.validate()?;
        let agent_count = self.setups.len();

        for (i, setup) in self.setups.iter().enumerate() {
            for (anchor, aoi) in [("home", setup.home), ("work", setup.work)] {
                if let Some(aoi) = aoi.filter(|&aoi| self.map.aoi_position(aoi).is_none()) {
                    return Err(SimError::UnknownAnchor { agent: AgentId(i as u32), anchor, aoi });
                }
            }
        }

        let positions = match self.positions {
            Some(p) => {
                if p.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      p.len(),
                        what:     "initial positions",
                    });
                }
                p
            }
            None => self
                .setups
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    s.home.ok_or_else(|| SimError::Config(format!("agent {i} has no home and no initial position")))
                })
                .collect::<SimResult<Vec<_>>>()?,
        };

        let ScenarioConfig { sim, engine, telemetry, travel_speed } = self.scenario;
        let mut world = World::new(self.map, self.weather, sim.tick_duration_secs, travel_speed);
        for aoi in positions {
            world.place(aoi)?;
        }

        let engine = Arc::new(engine);
        let telemetry = Arc::new(telemetry);
        let agents = self
            .setups
            .into_iter()
            .enumerate()
            .map(|(i, setup)| {
                MobilityAgent::new(AgentId(i as u32), sim.seed, setup, Arc::clone(&engine), Arc::clone(&telemetry))
            })
            .collect();

        Ok(Sim {
            clock: sim.make_clock(),
            config: sim,
            world,
            agents,
            completion: self.completion,
        })
    }
}
