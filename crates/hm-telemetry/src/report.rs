//! Human-readable and machine-exportable summaries.
//!
//! Every report implements `Display` for logs and `Serialize` for export.

use std::fmt;

use hm_core::{Activity, PerPhase, Phase};
use serde::Serialize;

use crate::validation::{self, ValidationEntry};

// ── DailyReport ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub day:                 u64,
    pub phase:               Phase,
    /// Trips recorded since the previous rollup.
    pub count:               u64,
    /// Cumulative refused trips.
    pub duplicate_attempts:  u64,
    pub valid:               u64,
    pub total:               u64,
    /// Most frequent first.
    pub activities:          Vec<(Activity, u64)>,
    pub peak_hours:          Vec<u8>,
    pub unique_destinations: usize,
    /// `None` on the baseline day.
    pub validation:          Option<ValidationEntry>,
    pub plausible:           bool,
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "day {} ({}): {} trips", self.day, self.phase, self.count)?;
        writeln!(
            f,
            "  duplicate attempts: {}  valid: {}/{} ({:.2}%)",
            self.duplicate_attempts,
            self.valid,
            self.total,
            pct(self.valid, self.total),
        )?;
        if !self.activities.is_empty() {
            let list: Vec<String> = self.activities.iter().map(|(a, n)| format!("{a} {n}")).collect();
            writeln!(f, "  activities: {}", list.join(", "))?;
        }
        if !self.peak_hours.is_empty() {
            let list: Vec<String> = self.peak_hours.iter().map(|h| format!("{h:02}:00")).collect();
            writeln!(f, "  peak hours: {}", list.join(", "))?;
        }
        writeln!(f, "  unique destinations: {}", self.unique_destinations)?;
        match &self.validation {
            None => writeln!(f, "  baseline day")?,
            Some(v) => {
                write!(f, "  change rate {:+.3}", v.change_rate)?;
                if let Some(e) = v.change_rate_error {
                    write!(f, " (error {e:.3})")?;
                }
                writeln!(f, ", KL {:.4}", v.kl_divergence)?;
            }
        }
        if !self.plausible {
            writeln!(f, "  WARNING: trip count outside the expected range")?;
        }
        Ok(())
    }
}

// ── FinalReport ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub count:                  u64,
    /// Fraction of valid trips taken in this phase.
    pub share:                  f64,
    pub peak_hour:              Option<u8>,
    pub mean_change_rate_error: Option<f64>,
    pub mean_kl_divergence:     Option<f64>,
    /// Average trips per active day, relative to the baseline day.
    pub mean_daily_change:      Option<f64>,
}

/// One agent's end-of-run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalReport {
    pub total:               u64,
    pub valid:               u64,
    pub duplicate_attempts:  u64,
    pub success_rate:        f64,
    pub duplicate_rate:      f64,
    pub baseline:            Option<u64>,
    pub phases:              PerPhase<PhaseSummary>,
    pub unique_destinations: usize,
    pub consistent:          bool,
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "trips: {} total, {} valid, {} duplicate attempts",
            self.total, self.valid, self.duplicate_attempts
        )?;
        writeln!(
            f,
            "success rate {:.2}%, duplicate rate {:.2}%",
            self.success_rate * 100.0,
            self.duplicate_rate * 100.0
        )?;
        if let Some(b) = self.baseline {
            writeln!(f, "baseline day: {b} trips")?;
        }
        for (phase, s) in self.phases.iter() {
            write!(f, "{phase}: {} trips ({:.1}%)", s.count, s.share * 100.0)?;
            if let Some(h) = s.peak_hour {
                write!(f, ", peak {h:02}:00")?;
            }
            if let Some(e) = s.mean_change_rate_error {
                write!(f, ", change-rate error {e:.4}")?;
            }
            if let Some(kl) = s.mean_kl_divergence {
                write!(f, ", KL {kl:.4}")?;
            }
            if let Some(c) = s.mean_daily_change {
                write!(f, ", vs baseline {:+.2}%", c * 100.0)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "unique destinations: {}", self.unique_destinations)?;
        writeln!(f, "counters consistent: {}", self.consistent)
    }
}

// ── PopulationReport ──────────────────────────────────────────────────────────

/// Aggregate over many agents' [`FinalReport`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationReport {
    pub agents:                 usize,
    pub total:                  u64,
    pub valid:                  u64,
    pub duplicate_attempts:     u64,
    pub trips_per_phase:        PerPhase<u64>,
    /// Mean over agents that have an entry for the phase.
    pub mean_change_rate_error: PerPhase<Option<f64>>,
    pub mean_kl_divergence:     PerPhase<Option<f64>>,
    pub inconsistent_agents:    usize,
}

impl PopulationReport {
    pub fn from_reports(reports: &[FinalReport]) -> Self {
        let per_phase_mean = |pick: fn(&PhaseSummary) -> Option<f64>| {
            PerPhase::from_fn(|phase| validation::mean(reports.iter().filter_map(|r| pick(r.phases.get(phase)))))
        };
        PopulationReport {
            agents:                 reports.len(),
            total:                  reports.iter().map(|r| r.total).sum(),
            valid:                  reports.iter().map(|r| r.valid).sum(),
            duplicate_attempts:     reports.iter().map(|r| r.duplicate_attempts).sum(),
            trips_per_phase:        PerPhase::from_fn(|phase| reports.iter().map(|r| r.phases.get(phase).count).sum()),
            mean_change_rate_error: per_phase_mean(|s| s.mean_change_rate_error),
            mean_kl_divergence:     per_phase_mean(|s| s.mean_kl_divergence),
            inconsistent_agents:    reports.iter().filter(|r| !r.consistent).count(),
        }
    }
}

impl fmt::Display for PopulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} agents: {} trips ({} valid), {} duplicate attempts",
            self.agents, self.total, self.valid, self.duplicate_attempts
        )?;
        for phase in Phase::ALL {
            write!(f, "  {phase}: {} trips", self.trips_per_phase.get(phase))?;
            if let Some(e) = self.mean_change_rate_error.get(phase) {
                write!(f, ", change-rate error {e:.4}")?;
            }
            if let Some(kl) = self.mean_kl_divergence.get(phase) {
                write!(f, ", KL {kl:.4}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  agents with inconsistent counters: {}", self.inconsistent_agents)
    }
}

fn pct(num: u64, den: u64) -> f64 {
    num as f64 / den.max(1) as f64 * 100.0
}
