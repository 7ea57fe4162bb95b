//! Cached daily summary row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::MatchId;

/// Format of the calendar-day cache key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// One generated summary per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Calendar-day key, `YYYY-MM-DD`
    pub date: String,

    /// Highest match id when the summary was generated
    pub last_match_id: MatchId,

    pub summary: String,

    pub created_at: DateTime<Utc>,
}

/// Cache key for a calendar day.
pub fn date_key(day: NaiveDate) -> String {
    day.format(DATE_KEY_FORMAT).to_string()
}
