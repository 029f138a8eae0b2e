//! In-memory environment the agents step against.
//!
//! `World` answers every capability query (time, position, weather, POIs)
//! from plain data and buffers movement commands until the apply phase.
//!
//! # Movement model
//!
//! Teleport-at-arrival: a travelling agent stays at its departure point
//! until `arrival_tick`, then appears at the destination AOI.  While in
//! transit it is between AOIs (`current_aoi` is `None`).  Travel time is
//! straight-line distance divided by `travel_speed`, rounded up to whole
//! ticks, and never less than one tick.

use std::sync::Mutex;

use hm_behavior::{MovementActuator, PositionSource, TimeSource, WeatherSource};
use hm_core::{AgentId, AoiId, SimTime, XyPoint};
use hm_spatial::{Poi, PoiIndex, PoiMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{SimError, SimResult};

// ── WeatherTimeline ───────────────────────────────────────────────────────────

/// Piecewise-constant weather reports.  Each entry holds from its start
/// time until the next entry begins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherTimeline {
    entries: Vec<(SimTime, String)>,
}

impl WeatherTimeline {
    /// A timeline reporting `initial` from time zero.
    pub fn new(initial: impl Into<String>) -> Self {
        Self { entries: vec![(SimTime::ZERO, initial.into())] }
    }

    /// Switch to `report` at `from`.  Entries are kept sorted by start time.
    pub fn then(mut self, from: SimTime, report: impl Into<String>) -> Self {
        let idx = self.entries.partition_point(|(t, _)| *t <= from);
        self.entries.insert(idx, (from, report.into()));
        self
    }

    /// The report in force at `now`.
    pub fn at(&self, now: SimTime) -> &str {
        let idx = self.entries.partition_point(|(t, _)| *t <= now);
        match idx.checked_sub(1).and_then(|i| self.entries.get(i)) {
            Some((_, report)) => report,
            None => "",
        }
    }
}

// ── Agent whereabouts ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct Transit {
    destination:  AoiId,
    target:       XyPoint,
    arrival_tick: u64,
}

#[derive(Clone, Debug, PartialEq)]
struct Whereabouts {
    aoi:      Option<AoiId>,
    position: XyPoint,
    transit:  Option<Transit>,
}

/// A movement accepted during the apply phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Departure {
    pub agent:        AgentId,
    pub from:         Option<AoiId>,
    pub to:           AoiId,
    pub arrival_tick: u64,
}

// ── World ─────────────────────────────────────────────────────────────────────

pub struct World {
    tick:               u64,
    now:                SimTime,
    tick_duration_secs: u32,
    /// Map units per simulated second.
    travel_speed:       f64,
    map:                PoiMap,
    weather:            WeatherTimeline,
    agents:             Vec<Whereabouts>,
    /// Movement commands issued during the intent phase.
    pending:            Mutex<Vec<(AgentId, AoiId)>>,
}

impl World {
    pub fn new(map: PoiMap, weather: WeatherTimeline, tick_duration_secs: u32, travel_speed: f64) -> Self {
        Self {
            tick: 0,
            now: SimTime::ZERO,
            tick_duration_secs,
            travel_speed,
            map,
            weather,
            agents: Vec::new(),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Add the next agent, standing inside `aoi`.  Ids are assigned in
    /// placement order.
    pub fn place(&mut self, aoi: AoiId) -> SimResult<AgentId> {
        let agent = AgentId(self.agents.len() as u32);
        let position = self
            .map
            .aoi_position(aoi)
            .ok_or(SimError::UnknownPlacement { agent, aoi })?;
        self.agents.push(Whereabouts { aoi: Some(aoi), position, transit: None });
        Ok(agent)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn map(&self) -> &PoiMap {
        &self.map
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn in_transit(&self, agent: AgentId) -> bool {
        self.agents.get(agent.index()).is_some_and(|w| w.transit.is_some())
    }

    pub fn set_time(&mut self, tick: u64, now: SimTime) {
        self.tick = tick;
        self.now = now;
    }

    /// Land every agent whose `arrival_tick <= tick`.
    pub fn tick_arrivals(&mut self, tick: u64) -> Vec<(AgentId, AoiId)> {
        let mut arrived = Vec::new();
        for (i, w) in self.agents.iter_mut().enumerate() {
            let Some(transit) = w.transit.take_if(|t| t.arrival_tick <= tick) else {
                continue;
            };
            w.aoi = Some(transit.destination);
            w.position = transit.target;
            arrived.push((AgentId(i as u32), transit.destination));
        }
        arrived
    }

    /// Start every buffered move, in ascending agent order.
    ///
    /// Commands for unknown agents or AOIs, and for agents already in
    /// transit, are dropped with a warning.
    pub fn apply_moves(&mut self, tick: u64) -> Vec<Departure> {
        let mut requests = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        requests.sort_by_key(|&(agent, _)| agent);

        let mut departures = Vec::with_capacity(requests.len());
        for (agent, destination) in requests {
            let Some(target) = self.map.aoi_position(destination) else {
                warn!(%agent, %destination, "move to unknown AOI ignored");
                continue;
            };
            let ticks = self.travel_ticks(agent, target);
            let Some(w) = self.agents.get_mut(agent.index()) else {
                warn!(%agent, "move for unknown agent ignored");
                continue;
            };
            if w.transit.is_some() {
                warn!(%agent, %destination, "agent already in transit, move ignored");
                continue;
            }
            let arrival_tick = tick + ticks;
            let from = w.aoi.take();
            w.transit = Some(Transit { destination, target, arrival_tick });
            debug!(%agent, %destination, arrival_tick, "departure");
            departures.push(Departure { agent, from, to: destination, arrival_tick });
        }
        departures
    }

    fn travel_ticks(&self, agent: AgentId, target: XyPoint) -> u64 {
        let Some(w) = self.agents.get(agent.index()) else {
            return 1;
        };
        let secs = if self.travel_speed > 0.0 {
            (w.position.distance(target) / self.travel_speed).ceil() as u64
        } else {
            0
        };
        secs.div_ceil(self.tick_duration_secs.max(1) as u64).max(1)
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

impl TimeSource for World {
    fn now(&self) -> SimTime {
        self.now
    }
}

impl PositionSource for World {
    fn current_aoi(&self, agent: AgentId) -> Option<AoiId> {
        self.agents.get(agent.index()).and_then(|w| w.aoi)
    }

    fn position(&self, agent: AgentId) -> Option<XyPoint> {
        self.agents.get(agent.index()).map(|w| w.position)
    }
}

impl WeatherSource for World {
    fn weather(&self) -> String {
        self.weather.at(self.now).to_owned()
    }
}

impl PoiIndex for World {
    fn nearby(&self, center: XyPoint, radius: f64, categories: &[&str]) -> Vec<Poi> {
        self.map.nearby(center, radius, categories)
    }

    fn aoi_position(&self, aoi: AoiId) -> Option<XyPoint> {
        self.map.aoi_position(aoi)
    }
}

impl MovementActuator for World {
    fn move_to(&self, agent: AgentId, destination: AoiId) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push((agent, destination)),
            Err(poisoned) => poisoned.into_inner().push((agent, destination)),
        }
    }
}
