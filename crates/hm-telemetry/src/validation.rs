//! Distribution metrics used by the daily rollup.

use serde::{Deserialize, Serialize};

pub const HOURS: usize = 24;

/// One completed day's validation result for the phase it ran under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationEntry {
    pub day:               u64,
    pub change_rate:       f64,
    /// `|change_rate - target|`; `None` when the phase has no target.
    pub change_rate_error: Option<f64>,
    pub kl_divergence:     f64,
}

/// Scale `weights` to sum to one.  An all-zero (or empty) input yields
/// all zeros.
pub fn normalize(weights: &[f64]) -> [f64; HOURS] {
    let mut out = [0.0; HOURS];
    let sum: f64 = weights.iter().take(HOURS).filter(|w| **w > 0.0).sum();
    if sum > 0.0 {
        for (o, &w) in out.iter_mut().zip(weights) {
            *o = w.max(0.0) / sum;
        }
    }
    out
}

/// Hourly histogram of `hours` (values ≥ 24 are ignored), normalised.
pub fn hourly_distribution(hours: impl IntoIterator<Item = u8>) -> [f64; HOURS] {
    let mut counts = [0.0; HOURS];
    for h in hours {
        if let Some(c) = counts.get_mut(h as usize) {
            *c += 1.0;
        }
    }
    normalize(&counts)
}

/// `Σ p·ln(p / max(q, floor))` over bins with `p > 0`.
pub fn kl_divergence(p: &[f64; HOURS], q: &[f64; HOURS], floor: f64) -> f64 {
    p.iter()
        .zip(q)
        .filter(|(p, _)| **p > 0.0)
        .map(|(&p, &q)| p * (p / q.max(floor)).ln())
        .sum()
}

/// Relative change of `count` against `baseline`; a zero baseline counts
/// as one.
pub fn change_rate(count: u64, baseline: u64) -> f64 {
    let base = baseline.max(1) as f64;
    (count as f64 - base) / base
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.into_iter().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
