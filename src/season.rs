//! Season token resolution.
//!
//! Query strings carry a `season` token that is one of `lifetime`,
//! `current`, or a numeric season id. Parsing is pure and happens before
//! any storage access so malformed tokens never reach the database.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::calculate::DateWindow;
use crate::models::{Season, SeasonId};
use crate::storage::{Database, StorageError};

/// Errors raised while resolving a season token.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("Invalid season parameter: {0}")]
    InvalidParameter(String),

    #[error("Season not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Parsed, not yet resolved, season token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonToken {
    Lifetime,
    Current,
    Id(SeasonId),
}

/// The scope a statistics query runs over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SeasonFilter {
    Lifetime,
    #[serde(rename_all = "camelCase")]
    Season {
        season_id: SeasonId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

impl SeasonFilter {
    pub fn from_season(season: &Season) -> Self {
        Self::Season {
            season_id: season.id,
            start_date: season.start_date,
            end_date: season.end_date,
        }
    }

    pub fn season_id(&self) -> Option<SeasonId> {
        match self {
            Self::Lifetime => None,
            Self::Season { season_id, .. } => Some(*season_id),
        }
    }

    /// Date window for streak and penalty calculations.
    pub fn window(&self) -> Option<DateWindow> {
        match self {
            Self::Lifetime => None,
            Self::Season {
                start_date,
                end_date,
                ..
            } => Some(DateWindow {
                start: *start_date,
                end: *end_date,
            }),
        }
    }
}

/// Parse a raw token. Absent and blank tokens mean lifetime.
pub fn parse_season_token(raw: Option<&str>) -> Result<SeasonToken, SeasonError> {
    let token = match raw.map(str::trim) {
        None | Some("") => return Ok(SeasonToken::Lifetime),
        Some(t) => t,
    };

    if token.eq_ignore_ascii_case("lifetime") {
        return Ok(SeasonToken::Lifetime);
    }
    if token.eq_ignore_ascii_case("current") {
        return Ok(SeasonToken::Current);
    }

    // Any integer is a lookup; ids that can never exist resolve to NotFound.
    token
        .parse::<SeasonId>()
        .map(SeasonToken::Id)
        .map_err(|_| SeasonError::InvalidParameter(token.to_string()))
}

/// Resolve a raw token against storage.
///
/// `current` creates the season for the quarter containing `today` when no
/// season is active.
pub async fn resolve_season(
    db: &Database,
    raw: Option<&str>,
    today: NaiveDate,
) -> Result<SeasonFilter, SeasonError> {
    let token = parse_season_token(raw)?;
    debug!("Resolving season token {:?}", token);

    match token {
        SeasonToken::Lifetime => Ok(SeasonFilter::Lifetime),
        SeasonToken::Current => {
            let season = db.ensure_active_season(today).await?;
            Ok(SeasonFilter::from_season(&season))
        }
        SeasonToken::Id(id) => db
            .get_season(id)
            .await?
            .map(|s| SeasonFilter::from_season(&s))
            .ok_or(SeasonError::NotFound),
    }
}
