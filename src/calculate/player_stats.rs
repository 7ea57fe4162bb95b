//! Per-player statistics assembly.
//!
//! Combines the record aggregator, the streak calculator and the
//! inactivity penalty into the payload served by the stats endpoints.

use chrono::NaiveDate;

use crate::models::{Match, Player, PlayerStats};

use super::inactivity::{inactivity_penalty, InactivityPolicy};
use super::record::{aggregate_record, player_matches};
use super::streak::{player_streak, DateWindow};

/// Inputs that shape a stats computation beyond the raw corpus.
#[derive(Debug, Clone, Copy)]
pub struct StatsContext {
    /// Season bounds when the corpus is season-scoped
    pub window: Option<DateWindow>,

    /// Date inactivity is measured against
    pub reference_date: NaiveDate,

    pub policy: InactivityPolicy,
}

impl StatsContext {
    /// Context for a computation as of `today`.
    ///
    /// When the window closed before `today` inactivity is measured against
    /// the window's last day instead.
    pub fn new(window: Option<DateWindow>, today: NaiveDate, policy: InactivityPolicy) -> Self {
        let reference_date = match window {
            Some(w) if w.end < today => w.end,
            _ => today,
        };
        Self {
            window,
            reference_date,
            policy,
        }
    }
}

/// Statistics for one player over an already-filtered match corpus.
pub fn compute_player_stats(player: &Player, matches: &[Match], ctx: &StatsContext) -> PlayerStats {
    let played = player_matches(matches, player.id);
    let record = aggregate_record(played.iter().copied(), player.id);
    let (streak, weekly) = player_streak(&played, player.id, ctx.window);
    let last_played = played.last().map(|m| m.date);

    let stats = PlayerStats {
        id: player.id,
        name: player.name.clone(),
        record,
        win_percentage: record.win_percentage(),
        streak,
        longest_streak: weekly.longest,
        last_played,
        actual_win_percentage: None,
        inactivity_penalty: None,
    };

    let penalty = last_played.map_or(0, |last| {
        inactivity_penalty(last.date_naive(), ctx.reference_date, &ctx.policy)
    });
    stats.with_penalty(penalty)
}

/// Statistics for every player, best first.
///
/// Ordered by displayed win percentage, then wins, then name.
pub fn compute_all_stats(players: &[Player], matches: &[Match], ctx: &StatsContext) -> Vec<PlayerStats> {
    let mut stats: Vec<PlayerStats> = players
        .iter()
        .map(|p| compute_player_stats(p, matches, ctx))
        .collect();

    stats.sort_by(|a, b| {
        b.win_percentage
            .cmp(&a.win_percentage)
            .then_with(|| b.record.wins.cmp(&a.record.wins))
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}
