//! Unit tests for hm-telemetry.

use std::sync::Arc;

use hm_core::{Activity, AoiId, Phase};

use crate::{TelemetryConfig, TelemetryLedger, TravelEvent};

fn ledger() -> TelemetryLedger {
    TelemetryLedger::new(Arc::new(TelemetryConfig::default()))
}

fn trip(day: u64, hour: u8, to: u32, phase: Phase) -> TravelEvent {
    TravelEvent {
        day,
        hour,
        from: Some(AoiId(1)),
        to: AoiId(to),
        activity: Activity::Shopping,
        phase,
    }
}

// ── Counter invariant ─────────────────────────────────────────────────────────

#[cfg(test)]
mod invariant_tests {
    use super::*;
    use crate::TelemetryError;

    #[test]
    fn holds_after_every_record() {
        let mut l = ledger();
        let phases = [Phase::Normal, Phase::During, Phase::After, Phase::During];
        for (i, phase) in phases.into_iter().enumerate() {
            l.record(trip(0, 8 + i as u8, 10, phase)).unwrap();
            let c = l.counters();
            assert_eq!(c.total, (i + 1) as u64);
            assert_eq!(c.hourly_sum(), c.total);
            assert_eq!(c.mode_sum(), c.total);
            assert_eq!(l.events().len() as u64, c.total);
        }
        assert_eq!(*l.counters().mode.get(Phase::During), 2);
    }

    #[test]
    fn empty_ledger_is_consistent() {
        assert!(ledger().check_consistency().is_ok());
    }

    #[test]
    fn tampered_counters_are_reported() {
        let mut l = ledger();
        l.record(trip(0, 9, 10, Phase::Normal)).unwrap();
        let mut c = l.counters().clone();
        c.total += 1;
        let err = c.verify(l.events().len()).unwrap_err();
        assert_eq!(
            err,
            TelemetryError::ConsistencyViolation { log_len: 1, total: 2, hourly_sum: 1, mode_sum: 1 }
        );
        assert!(err.to_string().contains("total=2"));
    }

    #[test]
    fn out_of_range_hour_lands_in_last_bin() {
        let mut l = ledger();
        l.record(trip(0, 30, 10, Phase::Normal)).unwrap();
        assert_eq!(l.counters().hourly.get(Phase::Normal)[23], 1);
    }

    #[test]
    fn duplicates_do_not_touch_trip_tallies() {
        let mut l = ledger();
        l.note_duplicate();
        l.note_duplicate();
        assert_eq!(l.counters().duplicates, 2);
        assert_eq!(l.counters().total, 0);
        assert!(l.check_consistency().is_ok());
    }
}

// ── Daily rollup ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod rollup_tests {
    use super::*;

    #[test]
    fn first_rollup_sets_baseline() {
        let mut l = ledger();
        for h in [8, 12, 17, 17] {
            l.record(trip(0, h, 10 + h as u32, Phase::Normal)).unwrap();
        }
        let report = l.daily_rollup(0, Phase::Normal);
        assert_eq!(l.baseline(), Some(4));
        assert_eq!(report.count, 4);
        assert!(report.validation.is_none());
        assert_eq!(report.peak_hours, vec![17]);
        assert_eq!(report.unique_destinations, 3);
        assert_eq!(report.activities, vec![(Activity::Shopping, 4)]);
        assert_eq!(l.counters().daily, 0);
        assert!(l.series(Phase::Normal).is_empty());
    }

    #[test]
    fn later_rollups_append_to_phase_series() {
        let mut l = ledger();
        for h in [8, 9, 12, 17] {
            l.record(trip(0, h, 10, Phase::Normal)).unwrap();
        }
        l.daily_rollup(0, Phase::Normal);

        l.record(trip(1, 10, 11, Phase::During)).unwrap();
        let report = l.daily_rollup(1, Phase::During);
        let entry = report.validation.unwrap();
        assert_eq!(entry.day, 1);
        assert!((entry.change_rate - (-0.75)).abs() < 1e-12);
        assert!((entry.change_rate_error.unwrap() - 0.10).abs() < 1e-9);
        assert!(entry.kl_divergence > 0.0);
        assert_eq!(l.series(Phase::During), &[entry]);
        assert!(l.series(Phase::Normal).is_empty());
    }

    #[test]
    fn normal_phase_has_no_error_target() {
        let mut l = ledger();
        l.record(trip(0, 8, 10, Phase::Normal)).unwrap();
        l.daily_rollup(0, Phase::Normal);
        l.record(trip(1, 8, 10, Phase::Normal)).unwrap();
        let entry = l.daily_rollup(1, Phase::Normal).validation.unwrap();
        assert_eq!(entry.change_rate, 0.0);
        assert_eq!(entry.change_rate_error, None);
    }

    #[test]
    fn zero_baseline_counts_as_one() {
        let mut l = ledger();
        l.daily_rollup(0, Phase::Normal);
        assert_eq!(l.baseline(), Some(0));
        l.record(trip(1, 8, 10, Phase::After)).unwrap();
        l.record(trip(1, 9, 10, Phase::After)).unwrap();
        let entry = l.daily_rollup(1, Phase::After).validation.unwrap();
        assert!((entry.change_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn implausible_count_is_flagged() {
        let mut l = ledger();
        for h in 6..10 {
            l.record(trip(0, h, 10, Phase::During)).unwrap();
        }
        let report = l.daily_rollup(0, Phase::During);
        assert!(!report.plausible);
        assert!(report.to_string().contains("WARNING"));
    }
}

// ── Validation metrics ────────────────────────────────────────────────────────

#[cfg(test)]
mod validation_tests {
    use crate::validation::{HOURS, change_rate, hourly_distribution, kl_divergence, mean, normalize};

    #[test]
    fn kl_of_identical_distributions_is_zero() {
        let p = normalize(&[1.0, 2.0, 3.0, 4.0]);
        assert!(kl_divergence(&p, &p, 1e-6).abs() < 1e-12);
    }

    #[test]
    fn kl_is_non_negative() {
        let p = normalize(&[0.1; HOURS]);
        let q = hourly_distribution([8, 8, 8, 17, 23]);
        assert!(kl_divergence(&p, &q, 1e-6) > 0.0);
        assert!(kl_divergence(&q, &p, 1e-6) >= 0.0);
    }

    #[test]
    fn empty_simulation_uses_floor() {
        let p = normalize(&[1.0; HOURS]);
        let q = [0.0; HOURS];
        let kl = kl_divergence(&p, &q, 1e-6);
        assert!((kl - (1.0 / HOURS as f64 / 1e-6).ln()).abs() < 1e-9);
    }

    #[test]
    fn normalize_sums_to_one() {
        let n = normalize(&[3.0, 1.0, -5.0]);
        assert!((n.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(n[2], 0.0);
        assert_eq!(normalize(&[]), [0.0; HOURS]);
    }

    #[test]
    fn change_rate_and_mean() {
        assert!((change_rate(2, 4) + 0.5).abs() < 1e-12);
        assert_eq!(change_rate(3, 0), 2.0);
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(std::iter::empty()), None);
    }
}

// ── Reports ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod report_tests {
    use super::*;
    use crate::PopulationReport;

    fn three_day_ledger() -> TelemetryLedger {
        let mut l = ledger();
        for h in [7, 8, 12, 17] {
            l.record(trip(0, h, 10 + h as u32, Phase::Normal)).unwrap();
        }
        l.daily_rollup(0, Phase::Normal);
        l.note_duplicate();
        l.record(trip(1, 11, 40, Phase::During)).unwrap();
        l.daily_rollup(1, Phase::During);
        l.record(trip(2, 9, 41, Phase::After)).unwrap();
        l.record(trip(2, 15, 42, Phase::After)).unwrap();
        l.daily_rollup(2, Phase::After);
        l
    }

    #[test]
    fn final_rates_and_shares() {
        let report = three_day_ledger().final_report();
        assert_eq!(report.total, 7);
        assert_eq!(report.valid, 7);
        assert_eq!(report.duplicate_attempts, 1);
        assert_eq!(report.success_rate, 1.0);
        assert!((report.duplicate_rate - 1.0 / 7.0).abs() < 1e-12);
        assert_eq!(report.baseline, Some(4));
        assert!(report.consistent);
        assert_eq!(report.unique_destinations, 7);

        let during = report.phases.get(Phase::During);
        assert_eq!(during.count, 1);
        assert!((during.share - 1.0 / 7.0).abs() < 1e-12);
        assert_eq!(during.peak_hour, Some(11));
        assert!((during.mean_daily_change.unwrap() + 0.75).abs() < 1e-12);
        assert!((during.mean_change_rate_error.unwrap() - 0.10).abs() < 1e-9);

        let normal = report.phases.get(Phase::Normal);
        assert_eq!(normal.peak_hour, Some(7));
        assert_eq!(normal.mean_kl_divergence, None);
        assert_eq!(normal.mean_daily_change, Some(0.0));
    }

    #[test]
    fn empty_ledger_report() {
        let report = ledger().final_report();
        assert_eq!(report.total, 0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report.phases.iter().all(|(_, s)| s.peak_hour.is_none() && s.mean_daily_change.is_none()));
    }

    #[test]
    fn display_mentions_each_phase() {
        let text = three_day_ledger().final_report().to_string();
        for phase in Phase::ALL {
            assert!(text.contains(phase.as_token()), "missing {phase} in:\n{text}");
        }
        assert!(text.contains("duplicate rate"));
    }

    #[test]
    fn serializes_to_json() {
        let report = three_day_ledger().final_report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total"], 7);
        assert_eq!(json["phases"]["during"]["count"], 1);
    }

    #[test]
    fn population_aggregate() {
        let a = three_day_ledger().final_report();
        let b = ledger().final_report();
        let pop = PopulationReport::from_reports(&[a, b]);
        assert_eq!(pop.agents, 2);
        assert_eq!(pop.total, 7);
        assert_eq!(*pop.trips_per_phase.get(Phase::After), 2);
        assert!(pop.mean_kl_divergence.get(Phase::During).is_some());
        assert_eq!(pop.inconsistent_agents, 0);
    }
}
