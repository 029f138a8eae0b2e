//! Error types for hm-telemetry.

use thiserror::Error;

/// The four independent trip tallies disagree.
///
/// This signals a defect in the recording path; the ledger never patches
/// the counters to hide it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    #[error(
        "counter invariant violated: log={log_len} total={total} hourly={hourly_sum} mode={mode_sum}"
    )]
    ConsistencyViolation {
        log_len:    u64,
        total:      u64,
        hourly_sum: u64,
        mode_sum:   u64,
    },
}

/// Alias for `Result<T, TelemetryError>`.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
