//! Two-stage travel decision and the Idle → Committed → Idle plan state.

use hm_core::{Activity, AgentRng, AoiId, SimTime};

/// An approved trip the agent is carrying out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Commitment {
    pub activity:    Activity,
    pub destination: AoiId,
    pub since:       SimTime,
}

/// Plan state.  While committed no new decision is evaluated.
#[derive(Clone, Debug, Default)]
pub struct TravelGate {
    plan: Option<Commitment>,
}

impl TravelGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_committed(&self) -> bool {
        self.plan.is_some()
    }

    pub fn commitment(&self) -> Option<&Commitment> {
        self.plan.as_ref()
    }

    /// Enter `Committed`.  Only call after the destination was approved.
    pub fn commit(&mut self, activity: Activity, destination: AoiId, now: SimTime) {
        self.plan = Some(Commitment { activity, destination, since: now });
    }

    /// Return to `Idle` if `current` is the committed destination, yielding
    /// the completed plan.
    pub fn complete_on_arrival(&mut self, current: Option<AoiId>) -> Option<Commitment> {
        match self.plan {
            Some(c) if current == Some(c.destination) => self.plan.take(),
            _ => None,
        }
    }

    /// Stage 1: admit travel iff a uniform draw is at most `travel_prob`.
    pub fn admit(&self, travel_prob: f64, rng: &mut AgentRng) -> bool {
        let roll: f64 = rng.random();
        roll <= travel_prob
    }
}

/// Stage 2: pick an activity from `(activity, adjusted probability)` pairs.
///
/// Pairs above `threshold` are sampled proportionally to their probability.
/// When none qualify, one of `backup` is drawn uniformly.  `None` only when
/// nothing qualifies and `backup` is empty.
pub fn select_activity(
    scored:    &[(Activity, f64)],
    threshold: f64,
    backup:    &[Activity],
    rng:       &mut AgentRng,
) -> Option<Activity> {
    let eligible: Vec<(Activity, f64)> = scored
        .iter()
        .copied()
        .filter(|&(_, p)| p > threshold)
        .collect();
    if eligible.is_empty() {
        return rng.choose(backup).copied();
    }
    let weights: Vec<f64> = eligible.iter().map(|&(_, p)| p).collect();
    rng.choose_weighted(&weights).map(|i| eligible[i].0)
}
