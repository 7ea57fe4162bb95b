//! Match model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MatchId, PlayerId, SeasonId};

/// Maximum number of player slots per team.
pub const MAX_TEAM_SIZE: usize = 3;

/// Highest games-won count accepted for one team in a match.
pub const MAX_GAMES_WON: u32 = u16::MAX as u32;

/// Fixed-width player slots for one team; unused slots are `None`.
pub type TeamSlots = [Option<PlayerId>; MAX_TEAM_SIZE];

/// Which side of a match a player was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    TeamOne,
    TeamTwo,
}

/// Result of a match from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// A recorded match between two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub team_one_player_ids: TeamSlots,
    pub team_two_player_ids: TeamSlots,
    pub team_one_games_won: u32,
    pub team_two_games_won: u32,
    pub date: DateTime<Utc>,
    pub season_id: Option<SeasonId>,
}

impl Match {
    /// Player ids on team one, skipping empty slots.
    pub fn team_one(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_one_player_ids.iter().flatten().copied()
    }

    /// Player ids on team two, skipping empty slots.
    pub fn team_two(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_two_player_ids.iter().flatten().copied()
    }

    /// Slots for the given side.
    pub fn slots(&self, side: Side) -> &TeamSlots {
        match side {
            Side::TeamOne => &self.team_one_player_ids,
            Side::TeamTwo => &self.team_two_player_ids,
        }
    }

    /// The side a player was on.
    ///
    /// Returns `None` when the player is absent, and also when the player
    /// appears on both teams (invalid data that must not be counted).
    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        let on_one = self.team_one().any(|id| id == player_id);
        let on_two = self.team_two().any(|id| id == player_id);
        match (on_one, on_two) {
            (true, false) => Some(Side::TeamOne),
            (false, true) => Some(Side::TeamTwo),
            _ => None,
        }
    }

    /// Games won by `side` and by its opponents.
    pub fn games_for(&self, side: Side) -> (u32, u32) {
        match side {
            Side::TeamOne => (self.team_one_games_won, self.team_two_games_won),
            Side::TeamTwo => (self.team_two_games_won, self.team_one_games_won),
        }
    }

    /// Match outcome from `side`'s point of view.
    pub fn outcome_for(&self, side: Side) -> Outcome {
        let (own, opp) = self.games_for(side);
        match own.cmp(&opp) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }

    /// Sum of games won by both teams.
    pub fn total_games(&self) -> u32 {
        self.team_one_games_won.saturating_add(self.team_two_games_won)
    }
}

/// Errors raised while validating a submitted match.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchValidationError {
    #[error("Team {0} must have at least one player")]
    EmptyTeam(u8),

    #[error("Team {0} can have at most 3 players")]
    TooManyPlayers(u8),

    #[error("Player {0} is listed twice on the same team")]
    DuplicatePlayer(PlayerId),

    #[error("Player {0} cannot play on both teams")]
    PlayerOnBothTeams(PlayerId),

    #[error("Games won must be a non-negative number")]
    NegativeScore,

    #[error("Games won must be at most 65535, got {0}")]
    ScoreTooLarge(i64),

    #[error("Invalid match date: {0}")]
    InvalidDate(String),
}

/// Request body for recording a match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub team_one_player_ids: Vec<Option<PlayerId>>,
    pub team_two_player_ids: Vec<Option<PlayerId>>,
    pub team_one_games_won: i64,
    pub team_two_games_won: i64,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; defaults to now.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub season_id: Option<SeasonId>,
}

/// A match that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMatch {
    pub team_one_player_ids: TeamSlots,
    pub team_two_player_ids: TeamSlots,
    pub team_one_games_won: u32,
    pub team_two_games_won: u32,
    pub date: DateTime<Utc>,
    pub season_id: Option<SeasonId>,
}

impl ValidatedMatch {
    /// Every player id in the match.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_one_player_ids
            .iter()
            .chain(self.team_two_player_ids.iter())
            .flatten()
            .copied()
    }
}

impl NewMatch {
    /// Validate team composition and scores.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ValidatedMatch, MatchValidationError> {
        let team_one = team_slots(&self.team_one_player_ids, 1)?;
        let team_two = team_slots(&self.team_two_player_ids, 2)?;

        if let Some(id) = team_one
            .iter()
            .flatten()
            .find(|id| team_two.iter().flatten().any(|other| other == *id))
        {
            return Err(MatchValidationError::PlayerOnBothTeams(*id));
        }

        let one_won = games_won(self.team_one_games_won)?;
        let two_won = games_won(self.team_two_games_won)?;

        let date = match self.date.as_deref() {
            Some(raw) => parse_match_date(raw)?,
            None => now,
        };

        Ok(ValidatedMatch {
            team_one_player_ids: team_one,
            team_two_player_ids: team_two,
            team_one_games_won: one_won,
            team_two_games_won: two_won,
            date,
            season_id: self.season_id,
        })
    }
}

fn games_won(raw: i64) -> Result<u32, MatchValidationError> {
    if raw < 0 {
        return Err(MatchValidationError::NegativeScore);
    }
    u32::try_from(raw)
        .ok()
        .filter(|won| *won <= MAX_GAMES_WON)
        .ok_or(MatchValidationError::ScoreTooLarge(raw))
}

fn team_slots(ids: &[Option<PlayerId>], team: u8) -> Result<TeamSlots, MatchValidationError> {
    let present: Vec<PlayerId> = ids.iter().flatten().copied().collect();
    if present.is_empty() {
        return Err(MatchValidationError::EmptyTeam(team));
    }
    if present.len() > MAX_TEAM_SIZE {
        return Err(MatchValidationError::TooManyPlayers(team));
    }

    let mut slots: TeamSlots = [None; MAX_TEAM_SIZE];
    for (i, id) in present.iter().enumerate() {
        if present[..i].contains(id) {
            return Err(MatchValidationError::DuplicatePlayer(*id));
        }
        slots[i] = Some(*id);
    }
    Ok(slots)
}

/// Parse an RFC 3339 timestamp, or a bare date taken as midnight UTC.
pub fn parse_match_date(raw: &str) -> Result<DateTime<Utc>, MatchValidationError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| MatchValidationError::InvalidDate(raw.to_string()))
}
