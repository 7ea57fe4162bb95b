//! Per-player win/loss aggregation.

use crate::models::{Match, PlayerId, Record};

/// Matches a player took part in, oldest first.
///
/// A match only counts when the player is on exactly one team.
pub fn player_matches(matches: &[Match], player_id: PlayerId) -> Vec<&Match> {
    let mut played: Vec<&Match> = matches
        .iter()
        .filter(|m| m.side_of(player_id).is_some())
        .collect();
    played.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    played
}

/// Tally a player's record over a match corpus.
///
/// Wins, losses and ties are match counts. `total_games` adds both teams'
/// games for every match the player appeared in, ties included.
pub fn aggregate_record<'a, I>(matches: I, player_id: PlayerId) -> Record
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut record = Record::default();

    for m in matches {
        let Some(side) = m.side_of(player_id) else {
            continue;
        };

        record.add_match(m, side);
    }

    record
}
