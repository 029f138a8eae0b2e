//! Travel and activity probabilities.
//!
//! Both functions are pure: all inputs (tables, demographic factors, the
//! location factor) are passed in, so the same model can be evaluated for
//! any `(phase, hour, activity)` triple in tests.

use hm_core::{Activity, Phase, TimeSlot};

use crate::{BehaviorTables, Location, Modifiers, PersonalityWeights};

/// Upper bound of [`ProbabilityModel::base_travel_prob`].
pub const MAX_TRAVEL_PROB: f64 = 0.95;
/// Upper bound of [`ProbabilityModel::activity_prob`].
pub const MAX_ACTIVITY_PROB: f64 = 0.98;

/// Borrowed view over one agent's tables and derived factors.
#[derive(Copy, Clone)]
pub struct ProbabilityModel<'a> {
    pub tables:    &'a BehaviorTables,
    pub modifiers: &'a Modifiers,
    pub weights:   &'a PersonalityWeights,
}

impl<'a> ProbabilityModel<'a> {
    pub fn new(
        tables:    &'a BehaviorTables,
        modifiers: &'a Modifiers,
        weights:   &'a PersonalityWeights,
    ) -> Self {
        Self { tables, modifiers, weights }
    }

    /// Probability that the agent considers travelling at all this hour,
    /// in `[0, 0.95]`.
    pub fn base_travel_prob(&self, phase: Phase, hour: u8, weekend: bool) -> f64 {
        let weekend_factor = if weekend { self.tables.weekend_multiplier(phase) } else { 1.0 };
        let p = self.tables.hourly_prob(phase, hour) * self.modifiers.product() * weekend_factor;
        p.clamp(0.0, MAX_TRAVEL_PROB)
    }

    /// Adjusted probability of `activity` in the slot containing `hour`,
    /// in `[0, 0.98]`.
    pub fn activity_prob(&self, phase: Phase, hour: u8, activity: Activity, location_factor: f64) -> f64 {
        let base = self.tables.slots.get(phase).base(TimeSlot::of_hour(hour), activity);
        let p = base * location_factor * self.weights.get(activity);
        p.clamp(0.0, MAX_ACTIVITY_PROB)
    }
}

/// How sensible `activity` is from where the agent stands.
///
/// Checked in order: going home while at home (0.1), working while at work
/// (0.2), repeating an activity still cooling down (0.3).
pub fn location_factor(activity: Activity, location: &Location, cooling_down: bool) -> f64 {
    if activity == Activity::GoHome && location.at_home() {
        0.1
    } else if activity == Activity::Work && location.at_work() {
        0.2
    } else if cooling_down {
        0.3
    } else {
        1.0
    }
}
