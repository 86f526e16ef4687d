//! Pure elapsed/remaining computation.
//!
//! Elapsed time is always recomputed from the cycle's `start_date` and the
//! current time, never accumulated tick by tick, so suspended processes and
//! late timers still report the right value on their next tick.

use chrono::{DateTime, Utc};

use crate::types::{Cycle, CycleId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub cycle_id: CycleId,
    /// Whole seconds since start, clamped to `0..=target_seconds`.
    pub elapsed_seconds: i64,
    pub target_seconds: i64,
    pub completed: bool,
}

impl Reconciliation {
    pub fn remaining_seconds(&self) -> i64 {
        self.target_seconds - self.elapsed_seconds
    }

    /// Remaining time as `MM:SS`.
    pub fn label(&self) -> String {
        format_remaining(self.remaining_seconds())
    }
}

/// Whole seconds from `start` to `now`. Sub-second remainders are dropped and a
/// clock that moved behind `start` reports zero.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(start).num_seconds().max(0)
}

pub fn reconcile(cycle: &Cycle, now: DateTime<Utc>) -> Reconciliation {
    let target_seconds = cycle.target_seconds();
    let elapsed = elapsed_seconds(cycle.start_date, now);
    let completed = elapsed >= target_seconds;

    Reconciliation {
        cycle_id: cycle.id.clone(),
        elapsed_seconds: elapsed.min(target_seconds),
        target_seconds,
        completed,
    }
}

/// Formats seconds as zero-padded `MM:SS`. Negative input formats as `00:00`.
pub fn format_remaining(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
