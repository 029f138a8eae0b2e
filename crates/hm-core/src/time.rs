//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing count of simulated seconds since
//! midnight of day 0, wrapped in [`SimTime`].  Every timestamp the engine
//! stores (cooldown expiries, last travel time, recent destinations) uses
//! this unit, so all interval arithmetic is exact integer math.
//!
//! The simulation advances in discrete ticks.  [`SimClock`] maps a tick
//! counter to a `SimTime`:
//!
//!   now = tick * tick_duration_secs
//!
//! The default tick is 900 s (15 simulated minutes).

use std::fmt;

pub const SECS_PER_HOUR: u64 = 3_600;
pub const SECS_PER_DAY: u64 = 86_400;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// Seconds elapsed since the start of simulated day 0.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Build a timestamp from a day index and a second-of-day.
    #[inline]
    pub fn from_day_secs(day: u64, second_of_day: u64) -> SimTime {
        SimTime(day * SECS_PER_DAY + second_of_day)
    }

    /// Simulated day index (0-based).
    #[inline]
    pub fn day(self) -> u64 {
        self.0 / SECS_PER_DAY
    }

    /// Seconds since midnight of the current day.
    #[inline]
    pub fn second_of_day(self) -> u64 {
        self.0 % SECS_PER_DAY
    }

    /// Hour of day in `0..24`.
    #[inline]
    pub fn hour(self) -> u8 {
        (self.second_of_day() / SECS_PER_HOUR) as u8
    }

    /// Days 5 and 6 of every week are weekend days.
    #[inline]
    pub fn is_weekend(self) -> bool {
        matches!(self.day() % 7, 5 | 6)
    }

    /// Seconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sod = self.second_of_day();
        write!(
            f,
            "day {} {:02}:{:02}",
            self.day(),
            sod / SECS_PER_HOUR,
            (sod % SECS_PER_HOUR) / 60
        )
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// How many simulated seconds one tick represents.
    pub tick_duration_secs: u32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: u64,
}

impl SimClock {
    pub fn new(tick_duration_secs: u32) -> Self {
        Self { tick_duration_secs, current_tick: 0 }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick += 1;
    }

    /// Simulated time of the current tick.
    #[inline]
    pub fn now(&self) -> SimTime {
        SimTime(self.current_tick * self.tick_duration_secs as u64)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{} ({})", self.current_tick, self.now())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from JSON by the application crate and passed to the
/// simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds per tick.  Must divide 3600 so every hour boundary is a tick.
    pub tick_duration_secs: u32,

    /// Total ticks to simulate.  Three days at 15-minute ticks: 288.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { tick_duration_secs: 900, total_ticks: 3 * 96, seed: 114_514 }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> u64 {
        self.total_ticks
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }
}
