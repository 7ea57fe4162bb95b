//! Seasons - bounded date ranges that matches are scoped to.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SeasonId;

/// A league season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: SeasonId,

    /// Human-readable name (e.g. "Q3 2025")
    pub name: String,

    /// First day of the season (inclusive)
    pub start_date: NaiveDate,

    /// Last day of the season (inclusive)
    pub end_date: NaiveDate,

    /// Whether this is the active season
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl Season {
    /// Check if a date falls within this season.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Errors raised while validating a submitted season.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeasonValidationError {
    #[error("Season name is required")]
    MissingName,

    #[error("Season end date must not be before its start date")]
    EndsBeforeStart,
}

/// Request body for creating a season.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeason {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}

impl NewSeason {
    /// Validate name and date ordering.
    pub fn validate(&self) -> Result<(), SeasonValidationError> {
        if self.name.trim().is_empty() {
            return Err(SeasonValidationError::MissingName);
        }
        if self.end_date < self.start_date {
            return Err(SeasonValidationError::EndsBeforeStart);
        }
        Ok(())
    }
}

/// A calendar quarter (Q1 Jan–Mar, Q2 Apr–Jun, Q3 Jul–Sep, Q4 Oct–Dec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarQuarter {
    pub year: i32,
    /// 1 through 4
    pub quarter: u32,
}

impl CalendarQuarter {
    /// The quarter containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        let month = (self.quarter - 1) * 3 + 1;
        NaiveDate::from_ymd_opt(self.year, month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn end_date(&self) -> NaiveDate {
        // Day before the first day of the next quarter
        let next = if self.quarter == 4 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.quarter * 3 + 1, 1)
        };
        next.and_then(|d| d.pred_opt()).unwrap_or(NaiveDate::MAX)
    }

    pub fn name(&self) -> String {
        format!("Q{} {}", self.quarter, self.year)
    }

    /// Season definition for this quarter, marked active.
    pub fn as_new_season(&self) -> NewSeason {
        NewSeason {
            name: self.name(),
            start_date: self.start_date(),
            end_date: self.end_date(),
            is_active: true,
        }
    }
}
