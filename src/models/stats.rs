//! Derived statistics models.
//!
//! None of these are persisted; they are rebuilt from the match corpus on
//! every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Match, Outcome, PlayerId, Side};

/// Win/loss tallies for a player or team.
///
/// `wins`, `losses` and `ties` count matches. `total_games`, `games_won` and
/// `games_lost` count individual games inside those matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total_games: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl Record {
    /// Matches with a winner (ties excluded).
    pub fn decided_matches(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// Every match counted, ties included.
    pub fn matches_played(&self) -> u32 {
        self.decided_matches().saturating_add(self.ties)
    }

    /// Count one match as played by `side`.
    ///
    /// Counters saturate instead of wrapping on oversized stored scores.
    pub fn add_match(&mut self, m: &Match, side: Side) {
        match m.outcome_for(side) {
            Outcome::Win => self.wins = self.wins.saturating_add(1),
            Outcome::Loss => self.losses = self.losses.saturating_add(1),
            Outcome::Tie => self.ties = self.ties.saturating_add(1),
        }
        let (own, opp) = m.games_for(side);
        self.games_won = self.games_won.saturating_add(own);
        self.games_lost = self.games_lost.saturating_add(opp);
        self.total_games = self.total_games.saturating_add(m.total_games());
    }

    /// Rounded percentage of decided matches won (0 when none were decided).
    pub fn win_percentage(&self) -> u32 {
        rounded_percentage(self.wins, self.decided_matches())
    }
}

/// `numerator / denominator * 100`, rounded half up, or 0 for an empty denominator.
pub fn rounded_percentage(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let (n, d) = (u64::from(numerator), u64::from(denominator));
    ((200 * n + d) / (2 * d)) as u32
}

/// Label attached to a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StreakType {
    #[default]
    Wins,
    Losses,
}

impl std::fmt::Display for StreakType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreakType::Wins => write!(f, "wins"),
            StreakType::Losses => write!(f, "losses"),
        }
    }
}

/// Current activity streak, in consecutive active weeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    #[serde(rename = "type")]
    pub kind: StreakType,
    pub count: u32,
}

/// Per-player statistics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub id: PlayerId,
    pub name: String,
    pub record: Record,

    /// Displayed win percentage, after any inactivity penalty
    pub win_percentage: u32,

    pub streak: Streak,

    /// Longest run of consecutive active weeks
    pub longest_streak: u32,

    pub last_played: Option<DateTime<Utc>>,

    /// Win percentage before the penalty (only when a penalty applies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_win_percentage: Option<u32>,

    /// Percentage points deducted for inactivity (only when non-zero)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactivity_penalty: Option<u32>,
}

impl PlayerStats {
    /// Deduct an inactivity penalty from the displayed win percentage.
    pub fn with_penalty(mut self, penalty: u32) -> Self {
        if penalty == 0 {
            return self;
        }
        let actual = self.win_percentage;
        self.actual_win_percentage = Some(actual);
        self.inactivity_penalty = Some(penalty);
        self.win_percentage = actual.saturating_sub(penalty);
        self
    }
}

/// Aggregated performance of one team line-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStat {
    /// Canonical team key (sorted ids joined with `-`)
    pub key: String,
    pub player_ids: Vec<PlayerId>,
    /// Human-readable line-up ("Alice, Bob and Cy")
    pub players: String,
    pub record: Record,
    pub win_percentage: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_stats(win_percentage: u32) -> PlayerStats {
        PlayerStats {
            id: 1,
            name: "Alice".to_string(),
            record: Record::default(),
            win_percentage,
            streak: Streak::default(),
            longest_streak: 0,
            last_played: None,
            actual_win_percentage: None,
            inactivity_penalty: None,
        }
    }

    #[test]
    fn test_rounded_percentage() {
        assert_eq!(rounded_percentage(0, 0), 0);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(rounded_percentage(5, 5), 100);
    }

    #[test]
    fn test_record_win_percentage_ignores_ties() {
        let record = Record {
            wins: 3,
            losses: 1,
            ties: 4,
            ..Default::default()
        };
        assert_eq!(record.win_percentage(), 75);
        assert_eq!(record.matches_played(), 8);
    }

    #[test]
    fn test_record_all_ties() {
        let record = Record {
            ties: 2,
            total_games: 8,
            ..Default::default()
        };
        assert_eq!(record.win_percentage(), 0);
    }

    #[test]
    fn test_with_penalty() {
        let stats = base_stats(60).with_penalty(15);
        assert_eq!(stats.win_percentage, 45);
        assert_eq!(stats.actual_win_percentage, Some(60));
        assert_eq!(stats.inactivity_penalty, Some(15));
    }

    #[test]
    fn test_with_penalty_saturates() {
        let stats = base_stats(10).with_penalty(40);
        assert_eq!(stats.win_percentage, 0);
    }

    #[test]
    fn test_zero_penalty_hides_fields() {
        let stats = base_stats(60).with_penalty(0);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("actualWinPercentage").is_none());
        assert!(json.get("inactivityPenalty").is_none());
        assert_eq!(json["streak"]["type"], "wins");
    }
}
