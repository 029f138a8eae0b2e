//! Duplicate-trip suppression.
//!
//! A resolved destination must pass four checks, in order, before the
//! agent may leave:
//!
//! 1. it is not the current location;
//! 2. the minimum interval since the last approved trip has elapsed;
//! 3. it is not among the most recent destinations (activity-exemptable);
//! 4. the activity is not cooling down (activity-exemptable).
//!
//! Approval stamps the trip time and starts the activity's cooldown.

use std::collections::{BTreeMap, VecDeque};

use hm_core::{Activity, AoiId, SimTime};
use thiserror::Error;
use tracing::debug;

use crate::GuardConfig;

// ── RecentDestinations ────────────────────────────────────────────────────────

/// Bounded FIFO of the locations the agent was last observed at.
#[derive(Clone, Debug)]
pub struct RecentDestinations {
    entries:  VecDeque<(AoiId, SimTime)>,
    capacity: usize,
}

impl RecentDestinations {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append, evicting the oldest entry once at capacity.
    pub fn push(&mut self, aoi: AoiId, at: SimTime) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((aoi, at));
    }

    pub fn contains(&self, aoi: AoiId) -> bool {
        self.entries.iter().any(|&(a, _)| a == aoi)
    }

    /// `true` if `aoi` is among the newest `n` entries.
    pub fn in_last(&self, n: usize, aoi: AoiId) -> bool {
        self.entries.iter().rev().take(n).any(|&(a, _)| a == aoi)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (AoiId, SimTime)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Cooldowns ─────────────────────────────────────────────────────────────────

/// Activity → expiry time.  Expired entries are ignored, not pruned.
#[derive(Clone, Debug, Default)]
pub struct Cooldowns(BTreeMap<Activity, SimTime>);

impl Cooldowns {
    pub fn set(&mut self, activity: Activity, until: SimTime) {
        self.0.insert(activity, until);
    }

    pub fn is_active(&self, activity: Activity, now: SimTime) -> bool {
        self.remaining(activity, now).is_some()
    }

    /// Seconds left on `activity`'s cooldown, `None` when absent or expired.
    pub fn remaining(&self, activity: Activity, now: SimTime) -> Option<u64> {
        self.0
            .get(&activity)
            .filter(|&&until| now < until)
            .map(|&until| until - now)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── DuplicateGuard ────────────────────────────────────────────────────────────

/// Why the guard refused a trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GuardRejection {
    #[error("destination is the current location")]
    AlreadyThere,

    #[error("only {elapsed}s since the last trip")]
    TooSoon { elapsed: u64 },

    #[error("destination was visited recently")]
    RecentlyVisited,

    #[error("{activity} is cooling down for another {remaining}s")]
    CoolingDown { activity: Activity, remaining: u64 },
}

/// Per-agent guard state.  Parameters come from a shared [`GuardConfig`].
#[derive(Clone, Debug, Default)]
pub struct DuplicateGuard {
    last_travel: Option<SimTime>,
    cooldowns:   Cooldowns,
}

impl DuplicateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_travel(&self) -> Option<SimTime> {
        self.last_travel
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn cooldowns_mut(&mut self) -> &mut Cooldowns {
        &mut self.cooldowns
    }

    /// Run all four checks without changing state.
    pub fn check(
        &self,
        config:      &GuardConfig,
        destination: AoiId,
        activity:    Activity,
        current:     Option<AoiId>,
        recent:      &RecentDestinations,
        now:         SimTime,
    ) -> Result<(), GuardRejection> {
        if current == Some(destination) {
            return Err(GuardRejection::AlreadyThere);
        }
        if let Some(last) = self.last_travel {
            let elapsed = now.since(last);
            if elapsed < config.min_interval_secs {
                return Err(GuardRejection::TooSoon { elapsed });
            }
        }
        // The recency check only engages once the window is full.
        if recent.len() >= config.recency_window
            && recent.in_last(config.recency_window, destination)
            && !config.recency_exempt.contains(&activity)
        {
            return Err(GuardRejection::RecentlyVisited);
        }
        if !config.cooldown_exempt.contains(&activity) {
            if let Some(remaining) = self.cooldowns.remaining(activity, now) {
                return Err(GuardRejection::CoolingDown { activity, remaining });
            }
        }
        Ok(())
    }

    /// [`check`](Self::check), and on success record the trip.
    pub fn approve(
        &mut self,
        config:      &GuardConfig,
        destination: AoiId,
        activity:    Activity,
        current:     Option<AoiId>,
        recent:      &RecentDestinations,
        now:         SimTime,
    ) -> Result<(), GuardRejection> {
        self.check(config, destination, activity, current, recent, now)?;
        let duration = config.cooldown_for(activity);
        self.last_travel = Some(now);
        self.cooldowns.set(activity, now + duration);
        debug!(%activity, %destination, cooldown_secs = duration, "trip approved");
        Ok(())
    }
}
