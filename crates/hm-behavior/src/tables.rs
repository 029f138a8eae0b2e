//! Immutable engine configuration.
//!
//! Every struct here has a `Default` carrying the canonical constants and
//! `#[serde(default)]`, so a JSON file only needs to name the values it
//! overrides.  One [`EngineConfig`] is built at startup and shared by all
//! agents behind an `Arc`.

use std::collections::BTreeMap;

use hm_core::{Activity, PerPhase, Phase, TimeSlot};
use hm_llm::CallPolicy;
use serde::{Deserialize, Serialize};

use crate::{BehaviorError, BehaviorResult};

/// Hourly travel probability used when an hour has no table entry.
pub const DEFAULT_HOURLY_PROB: f64 = 0.05;

// ── SlotTable ─────────────────────────────────────────────────────────────────

/// Base activity probabilities for each of the ten time slots of one phase.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotTable(Vec<BTreeMap<Activity, f64>>);

impl SlotTable {
    fn from_rows(rows: [&[(Activity, f64)]; TimeSlot::COUNT]) -> SlotTable {
        SlotTable(rows.iter().map(|row| row.iter().copied().collect()).collect())
    }

    /// Activities listed for `slot` with their base probability, in
    /// `Activity` order.
    pub fn activities(&self, slot: TimeSlot) -> impl Iterator<Item = (Activity, f64)> + '_ {
        self.0
            .get(slot.index())
            .into_iter()
            .flat_map(|row| row.iter().map(|(&a, &p)| (a, p)))
    }

    /// Base probability of `activity` in `slot`; 0.0 when not listed.
    pub fn base(&self, slot: TimeSlot, activity: Activity) -> f64 {
        self.0
            .get(slot.index())
            .and_then(|row| row.get(&activity))
            .copied()
            .unwrap_or(0.0)
    }
}

// ── BehaviorTables ────────────────────────────────────────────────────────────

/// Probability tables and scale factors consumed by the probability model
/// and the travel gate.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorTables {
    /// Hour-of-day travel probability, 24 entries per phase.
    pub hourly:           PerPhase<Vec<f64>>,
    pub slots:            PerPhase<SlotTable>,
    /// Global stage-1 scale per phase.
    pub propensity:       PerPhase<f64>,
    /// Stage-1 multiplier applied on weekend days.
    pub weekend:          PerPhase<f64>,
    /// Stage-2 inclusion threshold on `activity_prob`.
    pub stage2_threshold: f64,
    /// Uniform fallback when no slot activity clears the threshold.
    pub backup:           PerPhase<Vec<Activity>>,
}

impl BehaviorTables {
    pub fn hourly_prob(&self, phase: Phase, hour: u8) -> f64 {
        self.hourly
            .get(phase)
            .get(hour as usize)
            .copied()
            .unwrap_or(DEFAULT_HOURLY_PROB)
    }

    pub fn weekend_multiplier(&self, phase: Phase) -> f64 {
        *self.weekend.get(phase)
    }
}

impl Default for BehaviorTables {
    fn default() -> Self {
        use Activity as A;

        let normal = SlotTable::from_rows([
            &[(A::GoHome, 0.95), (A::Nightlife, 0.15)],
            &[(A::MorningExercise, 0.18), (A::Work, 0.65), (A::Grocery, 0.05)],
            &[(A::Work, 0.87), (A::Medical, 0.08), (A::PersonalCare, 0.03)],
            &[(A::Work, 0.85), (A::Shopping, 0.12), (A::BankErrands, 0.08)],
            &[(A::Lunch, 0.92), (A::Work, 0.70)],
            &[(A::Work, 0.82), (A::SocialVisit, 0.15), (A::Shopping, 0.18)],
            &[(A::Work, 0.75), (A::Exercise, 0.25), (A::Grocery, 0.35)],
            &[(A::GoHome, 0.85), (A::Grocery, 0.45), (A::Entertainment, 0.20)],
            &[(A::EveningLeisure, 0.55), (A::Entertainment, 0.28), (A::SocialVisit, 0.25)],
            &[(A::GoHome, 0.88), (A::Nightlife, 0.15), (A::Entertainment, 0.12)],
        ]);
        let during = SlotTable::from_rows([
            &[(A::GoHome, 0.98)],
            &[(A::GoHome, 0.95), (A::Grocery, 0.15)],
            &[(A::Grocery, 0.75), (A::Medical, 0.90), (A::Work, 0.30)],
            &[(A::Grocery, 0.80), (A::Medical, 0.85), (A::Work, 0.25)],
            &[(A::Lunch, 0.30), (A::Grocery, 0.70), (A::GoHome, 0.95)],
            &[(A::Grocery, 0.60), (A::GoHome, 0.98), (A::Work, 0.20)],
            &[(A::GoHome, 0.98), (A::Grocery, 0.40)],
            &[(A::GoHome, 0.98), (A::EveningLeisure, 0.08)],
            &[(A::GoHome, 0.98)],
            &[(A::GoHome, 0.98)],
        ]);
        let after = SlotTable::from_rows([
            &[(A::GoHome, 0.95)],
            &[(A::Work, 0.50), (A::Grocery, 0.30), (A::MorningExercise, 0.08)],
            &[(A::Work, 0.65), (A::Shopping, 0.40), (A::Medical, 0.25)],
            &[(A::Work, 0.70), (A::Shopping, 0.60), (A::BankErrands, 0.35)],
            &[(A::Lunch, 0.65), (A::Work, 0.60), (A::Shopping, 0.45)],
            &[(A::Work, 0.65), (A::Shopping, 0.55), (A::SocialVisit, 0.25)],
            &[
                (A::Work, 0.60), (A::GoHome, 0.70), (A::Grocery, 0.55),
                (A::Shopping, 0.45), (A::BankErrands, 0.35),
            ],
            &[(A::GoHome, 0.75), (A::Grocery, 0.45), (A::Entertainment, 0.30), (A::SocialVisit, 0.25)],
            &[(A::EveningLeisure, 0.45), (A::Entertainment, 0.35), (A::GoHome, 0.70)],
            &[(A::GoHome, 0.90), (A::Nightlife, 0.08)],
        ]);

        BehaviorTables {
            hourly: PerPhase::new(
                vec![
                    0.02, 0.01, 0.005, 0.002, 0.01, 0.03, 0.08, 0.15, 0.18, 0.12, 0.08, 0.06,
                    0.14, 0.08, 0.06, 0.07, 0.12, 0.16, 0.14, 0.10, 0.08, 0.06, 0.04, 0.03,
                ],
                vec![
                    0.003, 0.003, 0.003, 0.003, 0.005, 0.007, 0.03, 0.21, 0.27, 0.17, 0.11, 0.12,
                    0.13, 0.09, 0.07, 0.045, 0.05, 0.16, 0.085, 0.065, 0.025, 0.025, 0.003, 0.003,
                ],
                vec![
                    0.02, 0.013, 0.009, 0.007, 0.013, 0.03, 0.09, 0.20, 0.22, 0.20, 0.22, 0.17,
                    0.16, 0.16, 0.145, 0.155, 0.19, 0.23, 0.18, 0.15, 0.10, 0.075, 0.04, 0.02,
                ],
            ),
            slots:            PerPhase::new(normal, during, after),
            propensity:       PerPhase::new(1.0, 1.0, 1.0),
            weekend:          PerPhase::new(0.85, 1.0, 0.9),
            stage2_threshold: 0.05,
            backup: PerPhase::new(
                vec![A::GoHome],
                vec![A::GoHome],
                vec![A::Shopping, A::Grocery, A::BankErrands, A::Medical],
            ),
        }
    }
}

// ── GuardConfig ───────────────────────────────────────────────────────────────

/// Duplicate-trip suppression parameters.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Minimum seconds between two approved trips.
    pub min_interval_secs:     u64,
    /// How many of the most recent destinations the recency check looks at.
    pub recency_window:        usize,
    /// Capacity of the recent-destination FIFO.
    pub recent_capacity:       usize,
    pub cooldown_secs:         BTreeMap<Activity, u64>,
    pub default_cooldown_secs: u64,
    /// Activities allowed to revisit a recent destination.
    pub recency_exempt:        Vec<Activity>,
    /// Activities that ignore their own cooldown.
    pub cooldown_exempt:       Vec<Activity>,
}

impl GuardConfig {
    pub fn cooldown_for(&self, activity: Activity) -> u64 {
        self.cooldown_secs
            .get(&activity)
            .copied()
            .unwrap_or(self.default_cooldown_secs)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        use Activity as A;

        GuardConfig {
            min_interval_secs:     1_800,
            recency_window:        3,
            recent_capacity:       5,
            cooldown_secs: [
                (A::Work, 14_400),
                (A::GoHome, 7_200),
                (A::Lunch, 3_600),
                (A::Grocery, 5_400),
                (A::Shopping, 7_200),
                (A::Medical, 10_800),
                (A::Exercise, 3_600),
                (A::Entertainment, 5_400),
            ]
            .into_iter()
            .collect(),
            default_cooldown_secs: 3_600,
            recency_exempt:        vec![A::Medical, A::Grocery],
            cooldown_exempt:       Vec::new(),
        }
    }
}

// ── ResolverConfig ────────────────────────────────────────────────────────────

/// Destination search parameters.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Activities whose destination is picked with completion assistance.
    pub assisted:         Vec<Activity>,
    pub assisted_radius:  f64,
    pub nearest_radius:   f64,
    /// Per-activity radius overriding the two defaults above.
    pub radius_overrides: BTreeMap<Activity, f64>,
    /// Upper bound on candidates shown to the completion service.
    pub max_candidates:   usize,
    /// POI categories searched for each activity.
    pub categories:       BTreeMap<Activity, Vec<String>>,
}

impl ResolverConfig {
    pub fn is_assisted(&self, activity: Activity) -> bool {
        self.assisted.contains(&activity)
    }

    pub fn radius_for(&self, activity: Activity) -> f64 {
        if let Some(&r) = self.radius_overrides.get(&activity) {
            return r;
        }
        if self.is_assisted(activity) {
            self.assisted_radius
        } else {
            self.nearest_radius
        }
    }

    pub fn categories_for(&self, activity: Activity) -> &[String] {
        self.categories.get(&activity).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        use Activity as A;

        let table: [(Activity, &[&str]); 14] = [
            (A::Lunch, &["restaurant", "fast_food"]),
            (A::Entertainment, &["cinema", "theater", "museum", "bar"]),
            (A::SocialVisit, &["restaurant", "cafe", "park"]),
            (A::WeekendOuting, &["tourist_attraction", "park", "museum"]),
            (A::Grocery, &["supermarket", "convenience_store", "grocery", "market"]),
            (A::Shopping, &["shopping", "mall", "department_store", "clothing_store", "convenience_store"]),
            (A::Medical, &["hospital", "clinic", "pharmacy", "healthcare", "dentist"]),
            (A::Exercise, &["gym", "sport", "park", "fitness_center"]),
            (A::PersonalCare, &["beauty_salon", "barber", "spa", "hair_care"]),
            (A::BankErrands, &["bank", "government", "post_office", "atm"]),
            (A::Religious, &["church", "temple", "mosque", "synagogue"]),
            (A::MorningExercise, &["gym", "park", "trail", "fitness_center"]),
            (A::EveningLeisure, &["park", "cafe", "restaurant", "plaza"]),
            (A::Nightlife, &["bar", "club", "restaurant", "lounge"]),
        ];

        ResolverConfig {
            assisted:         vec![A::Lunch, A::Entertainment, A::SocialVisit, A::WeekendOuting],
            assisted_radius:  8_000.0,
            nearest_radius:   6_000.0,
            radius_overrides: [(A::Lunch, 5_000.0)].into_iter().collect(),
            max_candidates:   8,
            categories: table
                .into_iter()
                .map(|(a, cats)| (a, cats.iter().map(|c| (*c).to_owned()).collect()))
                .collect(),
        }
    }
}

// ── ClassifierConfig ──────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum simulated seconds between two classifications.
    pub interval_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig { interval_secs: 3_600 }
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Everything an agent's decision engine needs, injected at construction.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tables:     BehaviorTables,
    pub guard:      GuardConfig,
    pub resolver:   ResolverConfig,
    pub classifier: ClassifierConfig,
    pub policy:     CallPolicy,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document.
    pub fn from_json(text: &str) -> BehaviorResult<EngineConfig> {
        let config: EngineConfig =
            serde_json::from_str(text).map_err(|e| BehaviorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tables the engine cannot use.
    pub fn validate(&self) -> BehaviorResult<()> {
        for (phase, hourly) in self.tables.hourly.iter() {
            if hourly.len() > 24 {
                return Err(BehaviorError::Config(format!(
                    "{phase}: hourly table has {} entries, expected at most 24",
                    hourly.len()
                )));
            }
            if hourly.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(BehaviorError::Config(format!("{phase}: negative or non-finite hourly probability")));
            }
        }
        for (phase, &scale) in self.tables.propensity.iter() {
            if !scale.is_finite() || scale < 0.0 {
                return Err(BehaviorError::Config(format!("{phase}: invalid travel propensity {scale}")));
            }
        }
        if self.guard.recent_capacity < self.guard.recency_window {
            return Err(BehaviorError::Config(
                "recent_capacity must be at least recency_window".to_owned(),
            ));
        }
        if self.resolver.max_candidates == 0 {
            return Err(BehaviorError::Config("max_candidates must be positive".to_owned()));
        }
        Ok(())
    }
}
