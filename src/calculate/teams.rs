//! Team performance grouped by canonical team key.

use std::collections::HashMap;

use crate::models::{Match, PlayerId, Record, Side, TeamStat};

use super::team_key::{format_team_names, team_key, TeamMember};

/// Tally results for every distinct line-up in the corpus.
///
/// Sorted by win percentage, then matches played, then key.
pub fn team_performance(matches: &[Match], names: &HashMap<PlayerId, String>) -> Vec<TeamStat> {
    let mut teams: HashMap<String, (Vec<PlayerId>, Record)> = HashMap::new();

    for m in matches {
        for side in [Side::TeamOne, Side::TeamTwo] {
            let members: Vec<Option<TeamMember>> =
                m.slots(side).iter().map(|slot| slot.map(TeamMember::Id)).collect();
            let key = team_key(&members);
            if key.is_empty() {
                continue;
            }

            let entry = teams.entry(key).or_insert_with(|| {
                let mut ids: Vec<PlayerId> = m.slots(side).iter().flatten().copied().collect();
                ids.sort_unstable();
                ids.dedup();
                (ids, Record::default())
            });
            entry.1.add_match(m, side);
        }
    }

    let mut stats: Vec<TeamStat> = teams
        .into_iter()
        .map(|(key, (player_ids, record))| {
            let players = format_team_names(player_ids.iter().map(|id| {
                names
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| format!("Player {}", id))
            }));
            TeamStat {
                key,
                player_ids,
                players,
                win_percentage: record.win_percentage(),
                record,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.win_percentage
            .cmp(&a.win_percentage)
            .then_with(|| b.record.matches_played().cmp(&a.record.matches_played()))
            .then_with(|| a.key.cmp(&b.key))
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_match(id: i64, one: [Option<i64>; 3], two: [Option<i64>; 3], s1: u32, s2: u32) -> Match {
        Match {
            id,
            team_one_player_ids: one,
            team_two_player_ids: two,
            team_one_games_won: s1,
            team_two_games_won: s2,
            date: Utc.with_ymd_and_hms(2025, 7, 1, 18, 0, 0).unwrap(),
            season_id: None,
        }
    }

    fn names() -> HashMap<PlayerId, String> {
        [(1, "Alice"), (2, "Bob"), (3, "Cy"), (4, "Dee")]
            .into_iter()
            .map(|(id, n)| (id, n.to_string()))
            .collect()
    }

    #[test]
    fn test_slot_order_does_not_split_teams() {
        let matches = vec![
            make_match(1, [Some(1), Some(2), None], [Some(3), Some(4), None], 3, 1),
            make_match(2, [Some(4), Some(3), None], [None, Some(2), Some(1)], 0, 2),
        ];
        let stats = team_performance(&matches, &names());
        assert_eq!(stats.len(), 2);

        let ab = stats.iter().find(|t| t.key == "1-2").unwrap();
        assert_eq!(ab.record.wins, 2);
        assert_eq!(ab.record.losses, 0);
        assert_eq!(ab.players, "Alice and Bob");
        assert_eq!(ab.win_percentage, 100);

        let cd = stats.iter().find(|t| t.key == "3-4").unwrap();
        assert_eq!(cd.record.losses, 2);
        assert_eq!(cd.player_ids, vec![3, 4]);
    }

    #[test]
    fn test_sorted_by_win_percentage() {
        let matches = vec![make_match(1, [Some(1), None, None], [Some(2), None, None], 1, 3)];
        let stats = team_performance(&matches, &names());
        assert_eq!(stats[0].key, "2");
        assert_eq!(stats[1].key, "1");
    }

    #[test]
    fn test_unknown_player_name_falls_back() {
        let matches = vec![make_match(1, [Some(9), None, None], [Some(1), None, None], 1, 1)];
        let stats = team_performance(&matches, &names());
        let unknown = stats.iter().find(|t| t.key == "9").unwrap();
        assert_eq!(unknown.players, "Player 9");
        assert_eq!(unknown.record.ties, 1);
    }
}
