//! Weekly activity streaks.
//!
//! Matches are bucketed into Monday-start calendar weeks. Consecutive weeks
//! with at least one match form a streak; any empty week breaks it.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Match, Outcome, PlayerId, Streak, StreakType};

/// Inclusive date window that bounds streak computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Current and longest runs of consecutive active weeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyStreaks {
    /// Run ending at the most recent active week
    pub current: u32,
    pub longest: u32,
    pub active_weeks: u32,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Compute weekly streaks from activity dates.
///
/// Dates outside `window` are ignored entirely, so they neither extend nor
/// break a streak.
pub fn weekly_streaks<I>(dates: I, window: Option<DateWindow>) -> WeeklyStreaks
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut weeks: Vec<NaiveDate> = dates
        .into_iter()
        .filter(|d| window.map_or(true, |w| w.contains(*d)))
        .map(week_start)
        .collect();
    weeks.sort();
    weeks.dedup();

    if weeks.is_empty() {
        return WeeklyStreaks::default();
    }

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in weeks.windows(2) {
        if pair[1] - pair[0] == Duration::weeks(1) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    WeeklyStreaks {
        current: run,
        longest,
        active_weeks: weeks.len() as u32,
    }
}

/// Activity streak for a player over their own matches.
///
/// The label reflects the player's most recent match inside the window:
/// `wins` for a win, `losses` otherwise.
pub fn player_streak(
    matches: &[&Match],
    player_id: PlayerId,
    window: Option<DateWindow>,
) -> (Streak, WeeklyStreaks) {
    let in_window: Vec<&Match> = matches
        .iter()
        .copied()
        .filter(|m| window.map_or(true, |w| w.contains(m.date.date_naive())))
        .collect();

    let weekly = weekly_streaks(in_window.iter().map(|m| m.date.date_naive()), None);

    let kind = in_window
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)))
        .and_then(|m| m.side_of(player_id).map(|side| m.outcome_for(side)))
        .map_or(StreakType::Wins, |outcome| match outcome {
            Outcome::Win => StreakType::Wins,
            Outcome::Loss | Outcome::Tie => StreakType::Losses,
        });

    (
        Streak {
            kind,
            count: weekly.current,
        },
        weekly,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn match_on(id: i64, day: NaiveDate, s1: u32, s2: u32) -> Match {
        Match {
            id,
            team_one_player_ids: [Some(1), None, None],
            team_two_player_ids: [Some(2), None, None],
            team_one_games_won: s1,
            team_two_games_won: s2,
            date: Utc
                .from_utc_datetime(&day.and_hms_opt(18, 0, 0).unwrap()),
            season_id: None,
        }
    }

    #[test]
    fn test_week_start() {
        // 2025-07-16 is a Wednesday
        assert_eq!(week_start(date(2025, 7, 16)), date(2025, 7, 14));
        assert_eq!(week_start(date(2025, 7, 14)), date(2025, 7, 14));
        // Sunday belongs to the week that started the previous Monday
        assert_eq!(week_start(date(2025, 7, 20)), date(2025, 7, 14));
    }

    #[test]
    fn test_empty_dates() {
        let streaks = weekly_streaks(Vec::new(), None);
        assert_eq!(streaks, WeeklyStreaks::default());
    }

    #[test]
    fn test_consecutive_weeks() {
        let dates = vec![date(2025, 7, 1), date(2025, 7, 9), date(2025, 7, 17)];
        let streaks = weekly_streaks(dates, None);
        assert_eq!(streaks.current, 3);
        assert_eq!(streaks.longest, 3);
        assert_eq!(streaks.active_weeks, 3);
    }

    #[test]
    fn test_same_week_counts_once() {
        let dates = vec![date(2025, 7, 14), date(2025, 7, 15), date(2025, 7, 20)];
        let streaks = weekly_streaks(dates, None);
        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.active_weeks, 1);
    }

    #[test]
    fn test_gap_breaks_streak() {
        let dates = vec![
            date(2025, 6, 2),
            date(2025, 6, 9),
            date(2025, 6, 16),
            // skip week of 06-23
            date(2025, 7, 1),
        ];
        let streaks = weekly_streaks(dates, None);
        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.longest, 3);
    }

    #[test]
    fn test_streak_across_year_boundary() {
        let dates = vec![date(2024, 12, 24), date(2024, 12, 31), date(2025, 1, 8)];
        assert_eq!(weekly_streaks(dates, None).current, 3);
    }

    #[test]
    fn test_window_excludes_outside_weeks() {
        let window = DateWindow {
            start: date(2025, 7, 1),
            end: date(2025, 9, 30),
        };
        // The June match would extend the streak if it were counted
        let dates = vec![date(2025, 6, 26), date(2025, 7, 2), date(2025, 7, 9)];
        let streaks = weekly_streaks(dates, Some(window));
        assert_eq!(streaks.current, 2);
        assert_eq!(streaks.active_weeks, 2);
    }

    #[test]
    fn test_unsorted_input() {
        let dates = vec![date(2025, 7, 17), date(2025, 7, 1), date(2025, 7, 9)];
        assert_eq!(weekly_streaks(dates, None).current, 3);
    }

    #[test]
    fn test_player_streak_labels_last_result() {
        let matches = vec![
            match_on(1, date(2025, 7, 1), 3, 1),
            match_on(2, date(2025, 7, 8), 1, 3),
        ];
        let refs: Vec<&Match> = matches.iter().collect();

        let (alice, weekly) = player_streak(&refs, 1, None);
        assert_eq!(alice.kind, StreakType::Losses);
        assert_eq!(alice.count, 2);
        assert_eq!(weekly.longest, 2);

        let (bob, _) = player_streak(&refs, 2, None);
        assert_eq!(bob.kind, StreakType::Wins);
    }

    #[test]
    fn test_player_streak_no_matches() {
        let (streak, weekly) = player_streak(&[], 1, None);
        assert_eq!(streak.count, 0);
        assert_eq!(streak.kind, StreakType::Wins);
        assert_eq!(weekly.longest, 0);
    }
}
