//! Statistics calculation engine.
//!
//! Computes derived metrics from the stored match corpus:
//! - Canonical team keys
//! - Per-player win/loss records
//! - Weekly activity streaks
//! - Inactivity penalties
//! - Team line-up performance

pub mod inactivity;
pub mod player_stats;
pub mod record;
pub mod streak;
pub mod team_key;
pub mod teams;

pub use inactivity::{inactivity_penalty, InactivityPolicy, MAX_PENALTY_POINTS};
pub use player_stats::{compute_all_stats, compute_player_stats, StatsContext};
pub use record::{aggregate_record, player_matches};
pub use streak::{player_streak, week_start, weekly_streaks, DateWindow, WeeklyStreaks};
pub use team_key::{format_team_names, team_key, TeamMember};
pub use teams::team_performance;
