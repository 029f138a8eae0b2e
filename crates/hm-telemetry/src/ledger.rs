//! Per-agent trip ledger.
//!
//! # Counter invariant
//!
//! Every recorded trip is tallied four ways: the event log, `total`, the
//! per-phase hourly grid and the per-phase mode tally.  After every
//! [`record`](TelemetryLedger::record) all four must agree:
//!
//! ```text
//! sum(hourly[*][*]) == sum(mode[*]) == total == |log|
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use hm_core::{Activity, AoiId, PerPhase, Phase};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::report::{DailyReport, FinalReport, PhaseSummary};
use crate::validation::{self, HOURS, ValidationEntry};
use crate::{TelemetryConfig, TelemetryError, TelemetryResult, TravelEvent};

// ── Counters ──────────────────────────────────────────────────────────────────

/// Running tallies.  `daily` resets at each rollup; everything else only
/// grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Counters {
    pub total:      u64,
    pub daily:      u64,
    pub valid:      u64,
    pub duplicates: u64,
    pub hourly:     PerPhase<[u64; HOURS]>,
    pub mode:       PerPhase<u64>,
}

impl Counters {
    pub fn hourly_sum(&self) -> u64 {
        self.hourly.iter().map(|(_, h)| h.iter().sum::<u64>()).sum()
    }

    pub fn mode_sum(&self) -> u64 {
        self.mode.iter().map(|(_, &m)| m).sum()
    }

    /// Check the invariant against a log of `log_len` events.
    pub fn verify(&self, log_len: usize) -> TelemetryResult<()> {
        let log_len = log_len as u64;
        let (hourly_sum, mode_sum) = (self.hourly_sum(), self.mode_sum());
        if hourly_sum == mode_sum && mode_sum == self.total && self.total == log_len {
            Ok(())
        } else {
            Err(TelemetryError::ConsistencyViolation {
                log_len,
                total: self.total,
                hourly_sum,
                mode_sum,
            })
        }
    }
}

// ── TelemetryLedger ───────────────────────────────────────────────────────────

pub struct TelemetryLedger {
    config:   Arc<TelemetryConfig>,
    events:   Vec<TravelEvent>,
    counters: Counters,
    baseline: Option<u64>,
    series:   PerPhase<Vec<ValidationEntry>>,
}

impl TelemetryLedger {
    pub fn new(config: Arc<TelemetryConfig>) -> Self {
        Self {
            config,
            events:   Vec::new(),
            counters: Counters::default(),
            baseline: None,
            series:   PerPhase::default(),
        }
    }

    pub fn events(&self) -> &[TravelEvent] {
        &self.events
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Trip count of the first completed day, once it exists.
    pub fn baseline(&self) -> Option<u64> {
        self.baseline
    }

    pub fn series(&self, phase: Phase) -> &[ValidationEntry] {
        self.series.get(phase)
    }

    /// Append an approved trip and update every tally.
    ///
    /// Returns `ConsistencyViolation` if the tallies disagree afterwards.
    /// The event stays recorded either way.
    pub fn record(&mut self, event: TravelEvent) -> TelemetryResult<()> {
        let hour = (event.hour as usize).min(HOURS - 1);
        self.events.push(event);
        self.counters.total += 1;
        self.counters.daily += 1;
        self.counters.valid += 1;
        self.counters.hourly.get_mut(event.phase)[hour] += 1;
        *self.counters.mode.get_mut(event.phase) += 1;
        debug!(
            day = event.day,
            hour = event.hour,
            activity = %event.activity,
            to = %event.to,
            total = self.counters.total,
            daily = self.counters.daily,
            "trip recorded"
        );
        self.check_consistency()
    }

    /// Count a trip the duplicate guard refused.
    pub fn note_duplicate(&mut self) {
        self.counters.duplicates += 1;
    }

    pub fn check_consistency(&self) -> TelemetryResult<()> {
        self.counters.verify(self.events.len()).inspect_err(|e| {
            error!(error = %e, "telemetry counters inconsistent");
        })
    }

    /// Close `day`, which ran under `phase`.
    ///
    /// The first rollup sets the baseline.  Every later one appends a
    /// [`ValidationEntry`] to `phase`'s series.  `daily` is reset.
    pub fn daily_rollup(&mut self, day: u64, phase: Phase) -> DailyReport {
        let count = self.counters.daily;
        let day_events: Vec<&TravelEvent> = self.events.iter().filter(|e| e.day == day).collect();

        let entry = match self.baseline {
            None => {
                self.baseline = Some(count);
                info!(day, baseline = count, "baseline day recorded");
                None
            }
            Some(baseline) => {
                let rate = validation::change_rate(count, baseline);
                let error = self.config.target(phase).map(|target| (rate - target).abs());
                let reference = validation::normalize(&self.config.reference);
                let simulated = validation::hourly_distribution(day_events.iter().map(|e| e.hour));
                let kl = validation::kl_divergence(&reference, &simulated, self.config.kl_floor);
                let entry = ValidationEntry {
                    day,
                    change_rate:       rate,
                    change_rate_error: error,
                    kl_divergence:     kl,
                };
                self.series.get_mut(phase).push(entry);
                info!(day, %phase, change_rate = rate, error = ?error, kl, "daily validation");
                Some(entry)
            }
        };

        let plausible = self.config.is_plausible(phase, count);
        if !plausible {
            let (lo, hi) = *self.config.plausible_daily.get(phase);
            warn!(day, %phase, count, lo, hi, "daily trip count outside expected range");
        }

        let report = DailyReport {
            day,
            phase,
            count,
            duplicate_attempts: self.counters.duplicates,
            valid: self.counters.valid,
            total: self.counters.total,
            activities: activity_histogram(day_events.iter().map(|e| e.activity)),
            peak_hours: peak_hours(day_events.iter().map(|e| e.hour)),
            unique_destinations: unique(day_events.iter().map(|e| e.to)),
            validation: entry,
            plausible,
        };
        self.counters.daily = 0;
        report
    }

    /// End-of-run summary.
    pub fn final_report(&self) -> FinalReport {
        let c = &self.counters;
        let valid = c.valid.max(1) as f64;
        let phases = PerPhase::from_fn(|phase| {
            let hourly = c.hourly.get(phase);
            let count = *c.mode.get(phase);
            let series = self.series.get(phase);
            PhaseSummary {
                count,
                share: count as f64 / valid,
                peak_hour: peak_hour(hourly),
                mean_change_rate_error: validation::mean(series.iter().filter_map(|e| e.change_rate_error)),
                mean_kl_divergence: validation::mean(series.iter().map(|e| e.kl_divergence)),
                mean_daily_change: self.mean_daily_change(phase, count),
            }
        });
        FinalReport {
            total: c.total,
            valid: c.valid,
            duplicate_attempts: c.duplicates,
            success_rate: c.valid as f64 / c.total.max(1) as f64,
            duplicate_rate: c.duplicates as f64 / c.total.max(1) as f64,
            baseline: self.baseline,
            phases,
            unique_destinations: unique(self.events.iter().map(|e| e.to)),
            consistent: self.counters.verify(self.events.len()).is_ok(),
        }
    }

    /// Average trips per active day of `phase`, relative to the baseline.
    fn mean_daily_change(&self, phase: Phase, count: u64) -> Option<f64> {
        let baseline = self.baseline.filter(|&b| b > 0)? as f64;
        let days: BTreeSet<u64> = self.events.iter().filter(|e| e.phase == phase).map(|e| e.day).collect();
        if days.is_empty() {
            return None;
        }
        let avg = count as f64 / days.len() as f64;
        Some((avg - baseline) / baseline)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Counts per activity, most frequent first (ties in `Activity` order).
fn activity_histogram(activities: impl Iterator<Item = Activity>) -> Vec<(Activity, u64)> {
    let mut counts: BTreeMap<Activity, u64> = BTreeMap::new();
    for a in activities {
        *counts.entry(a).or_default() += 1;
    }
    let mut hist: Vec<(Activity, u64)> = counts.into_iter().collect();
    hist.sort_by(|a, b| b.1.cmp(&a.1));
    hist
}

/// Every hour sharing the maximum non-zero count.
fn peak_hours(hours: impl Iterator<Item = u8>) -> Vec<u8> {
    let mut counts = [0u64; HOURS];
    for h in hours {
        if let Some(c) = counts.get_mut(h as usize) {
            *c += 1;
        }
    }
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    (0..HOURS as u8).filter(|&h| counts[h as usize] == max).collect()
}

/// Earliest hour with the highest count, `None` for an empty grid.
fn peak_hour(hourly: &[u64; HOURS]) -> Option<u8> {
    let max = *hourly.iter().max()?;
    if max == 0 {
        return None;
    }
    hourly.iter().position(|&c| c == max).map(|h| h as u8)
}

fn unique(ids: impl Iterator<Item = AoiId>) -> usize {
    ids.collect::<BTreeSet<_>>().len()
}
