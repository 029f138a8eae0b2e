//! One simulated person: owns all of its decision state and runs one
//! decision step per tick.
//!
//! # Step order
//!
//! ```text
//! ① observe    — read the current AOI; a new AOI enters RecentDestinations
//! ② classify   — at most hourly; a phase change clears every cooldown
//! ③ roll up    — close the previous day under the phase just classified
//! ④ committed? — arrival completes the plan, otherwise the agent is en route
//! ⑤ decide     — stage 1 → stage 2 → resolve → guard → record + move
//! ```

use std::sync::Arc;

use hm_behavior::{
    AgentSetup, DestinationResolver, DuplicateGuard, EngineConfig, Environment, GuardRejection, Location,
    ModeClassifier, Modifiers, PersonalityWeights, PhaseChange, ProbabilityModel, Profile, RecentDestinations,
    ResolveContext, TextCompletionService, TravelGate, location_factor, select_activity,
};
use hm_core::{Activity, AgentId, AgentRng, AoiId, Phase, SimTime, TimeSlot, XyPoint};
use hm_telemetry::{DailyReport, FinalReport, TelemetryConfig, TelemetryError, TelemetryLedger, TravelEvent};
use tracing::{debug, info};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Why a tick ended without travel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StayReason {
    /// Stage 1 did not admit travel.
    NotAdmitted,
    /// Stage 2 found no activity and the backup list was empty.
    NoActivity,
    /// No destination could be resolved for the chosen activity.
    NoDestination(Activity),
    Rejected(GuardRejection),
}

/// Result of one decision step.  Exactly one per agent per tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Travel { activity: Activity, destination: AoiId },
    Stay(StayReason),
    EnRoute,
}

impl TickOutcome {
    pub fn is_travel(&self) -> bool {
        matches!(self, TickOutcome::Travel { .. })
    }
}

/// Everything a step produced besides the outcome.
#[derive(Debug)]
pub struct StepReport {
    pub agent:        AgentId,
    pub outcome:      TickOutcome,
    pub phase_change: Option<PhaseChange>,
    /// Rollup of the day that ended before this tick.
    pub rollup:       Option<DailyReport>,
    pub violation:    Option<TelemetryError>,
}

// ── MobilityAgent ─────────────────────────────────────────────────────────────

pub struct MobilityAgent {
    id:         AgentId,
    rng:        AgentRng,
    profile:    Profile,
    modifiers:  Modifiers,
    weights:    PersonalityWeights,
    location:   Location,
    recent:     RecentDestinations,
    classifier: ModeClassifier,
    gate:       TravelGate,
    guard:      DuplicateGuard,
    ledger:     TelemetryLedger,
    config:     Arc<EngineConfig>,
    /// Day of the most recent step, `None` before the first.
    day:        Option<u64>,
    observed:   bool,
}

impl MobilityAgent {
    pub fn new(
        id:        AgentId,
        seed:      u64,
        setup:     AgentSetup,
        config:    Arc<EngineConfig>,
        telemetry: Arc<TelemetryConfig>,
    ) -> Self {
        let modifiers = Modifiers::from_profile(&setup.profile);
        let weights = PersonalityWeights::from_profile(&setup.profile);
        Self {
            id,
            rng: AgentRng::new(seed, id),
            profile: setup.profile,
            modifiers,
            weights,
            location: Location { current: None, home: setup.home, work: setup.work },
            recent: RecentDestinations::new(config.guard.recent_capacity),
            classifier: ModeClassifier::default(),
            gate: TravelGate::new(),
            guard: DuplicateGuard::new(),
            ledger: TelemetryLedger::new(telemetry),
            config,
            day: None,
            observed: false,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.classifier.phase()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn recent(&self) -> &RecentDestinations {
        &self.recent
    }

    pub fn gate(&self) -> &TravelGate {
        &self.gate
    }

    pub fn guard(&self) -> &DuplicateGuard {
        &self.guard
    }

    pub fn ledger(&self) -> &TelemetryLedger {
        &self.ledger
    }

    /// Run one decision step against `env`.
    pub async fn step<E, S>(&mut self, env: &E, completion: &S) -> StepReport
    where
        E: Environment + ?Sized,
        S: TextCompletionService,
    {
        let now = env.now();
        let current = env.current_aoi(self.id);
        let position = env.position(self.id).unwrap_or_default();
        self.observe(current, now);

        let phase_change = if self.classifier.is_due(now, &self.config.classifier) {
            let weather = env.weather();
            let change = self
                .classifier
                .refresh(&weather, now, &self.config.classifier, &self.config.policy, completion)
                .await;
            if change.is_some() {
                self.guard.cooldowns_mut().clear();
            }
            change
        } else {
            None
        };

        let rollup = match self.day {
            Some(day) if now.day() > day => Some(self.ledger.daily_rollup(day, self.classifier.phase())),
            _ => None,
        };
        self.day = Some(now.day());

        let mut report = StepReport {
            agent: self.id,
            outcome: TickOutcome::EnRoute,
            phase_change,
            rollup,
            violation: None,
        };

        if self.gate.is_committed() {
            match self.gate.complete_on_arrival(current) {
                Some(done) => {
                    info!(agent = %self.id, activity = %done.activity, destination = %done.destination, "activity completed");
                }
                None => return report,
            }
        }

        report.outcome = self.decide(env, completion, position, &mut report.violation).await;
        report
    }

    /// Close the current day and summarise the whole run.
    pub fn finish(&mut self) -> (Option<DailyReport>, FinalReport) {
        let rollup = self.day.take().map(|day| self.ledger.daily_rollup(day, self.classifier.phase()));
        (rollup, self.ledger.final_report())
    }

    fn observe(&mut self, current: Option<AoiId>, now: SimTime) {
        if self.observed && current != self.location.current {
            debug!(agent = %self.id, from = ?self.location.current, to = ?current, "location changed");
            if let Some(aoi) = current {
                self.recent.push(aoi, now);
            }
        }
        self.observed = true;
        self.location.current = current;
    }

    async fn decide<E, S>(
        &mut self,
        env:        &E,
        completion: &S,
        position:   XyPoint,
        violation:  &mut Option<TelemetryError>,
    ) -> TickOutcome
    where
        E: Environment + ?Sized,
        S: TextCompletionService,
    {
        let now = env.now();
        let hour = now.hour();
        let phase = self.classifier.phase();
        let config = &*self.config;
        let tables = &config.tables;
        let model = ProbabilityModel::new(tables, &self.modifiers, &self.weights);

        // Stage 1.
        let travel_prob = model.base_travel_prob(phase, hour, now.is_weekend()) * tables.propensity.get(phase);
        if !self.gate.admit(travel_prob, &mut self.rng) {
            return TickOutcome::Stay(StayReason::NotAdmitted);
        }

        // Stage 2.
        let cooldowns = self.guard.cooldowns();
        let scored: Vec<(Activity, f64)> = tables
            .slots
            .get(phase)
            .activities(TimeSlot::of_hour(hour))
            .map(|(activity, _)| {
                let factor = location_factor(activity, &self.location, cooldowns.is_active(activity, now));
                (activity, model.activity_prob(phase, hour, activity, factor))
            })
            .collect();
        let Some(activity) =
            select_activity(&scored, tables.stage2_threshold, tables.backup.get(phase), &mut self.rng)
        else {
            return TickOutcome::Stay(StayReason::NoActivity);
        };

        let ctx = ResolveContext {
            location: self.location,
            position,
            recent: &self.recent,
            phase,
            profile: &self.profile,
        };
        let resolver = DestinationResolver::new(&config.resolver, &config.policy, env, completion);
        let Some(destination) = resolver.resolve(activity, &ctx, &mut self.rng).await else {
            debug!(agent = %self.id, %activity, "no destination");
            return TickOutcome::Stay(StayReason::NoDestination(activity));
        };

        let current = self.location.current;
        if let Err(rejection) = self.guard.approve(&config.guard, destination, activity, current, &self.recent, now) {
            self.ledger.note_duplicate();
            info!(agent = %self.id, %activity, %destination, reason = %rejection, "trip rejected");
            return TickOutcome::Stay(StayReason::Rejected(rejection));
        }

        let event = TravelEvent { day: now.day(), hour, from: current, to: destination, activity, phase };
        if let Err(e) = self.ledger.record(event) {
            *violation = Some(e);
        }
        env.move_to(self.id, destination);
        self.gate.commit(activity, destination, now);
        info!(agent = %self.id, %activity, %destination, %phase, "trip started");
        TickOutcome::Travel { activity, destination }
    }
}
