//! Inactivity penalty applied to displayed win percentages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound for any penalty, in percentage points.
pub const MAX_PENALTY_POINTS: u32 = 100;

/// Shape of the inactivity penalty curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactivityPolicy {
    /// Days without a match before any penalty applies
    pub grace_days: u32,

    /// Points deducted per started week beyond the grace period
    pub points_per_week: u32,

    /// Penalty ceiling (clamped to 100)
    pub max_penalty: u32,
}

impl Default for InactivityPolicy {
    fn default() -> Self {
        Self {
            grace_days: 14,
            points_per_week: 5,
            max_penalty: 50,
        }
    }
}

/// Penalty in percentage points for a player last active on `last_active`.
///
/// Zero inside the grace period, then grows by `points_per_week` for every
/// started week of further inactivity until it reaches the ceiling. The
/// result never decreases as the gap grows and always lies in `[0, 100]`.
pub fn inactivity_penalty(
    last_active: NaiveDate,
    reference: NaiveDate,
    policy: &InactivityPolicy,
) -> u32 {
    let idle_days = (reference - last_active).num_days();
    let grace = i64::from(policy.grace_days);
    if idle_days <= grace {
        return 0;
    }

    let overdue_weeks = (idle_days - grace + 6) / 7;
    let ceiling = policy.max_penalty.min(MAX_PENALTY_POINTS);
    let raw = overdue_weeks.saturating_mul(i64::from(policy.points_per_week));
    raw.min(i64::from(ceiling)) as u32
}
