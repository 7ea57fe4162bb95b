//! Order-independent team identity.
//!
//! A team is the same team no matter which slot each player was entered
//! in, so grouping always goes through these canonical keys.

use std::fmt;

use crate::models::PlayerId;

/// Separator between ids in a team key.
pub const TEAM_KEY_SEPARATOR: &str = "-";

/// Canonical key for a team given its (possibly empty) id slots.
///
/// Empty slots are dropped, repeated ids collapse to one and the rest are
/// sorted numerically: `[3, 1, 2]` becomes `"1-2-3"`.
fn format_team(ids: &[Option<PlayerId>]) -> String {
    let mut ids: Vec<PlayerId> = ids.iter().flatten().copied().collect();
    ids.sort_unstable();
    ids.dedup();
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(TEAM_KEY_SEPARATOR)
}

/// Human-readable line-up: "No players", "A", "A and B", "A, B and C".
///
/// Names are sorted so any ordering of the same players reads the same.
pub fn format_team_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<String> = names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    names.sort();
    names.dedup();

    match names.as_slice() {
        [] => "No players".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// A team member identified either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamMember {
    Id(PlayerId),
    Name(String),
}

impl fmt::Display for TeamMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamMember::Id(id) => write!(f, "{}", id),
            TeamMember::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Canonical key for a team whose members may be ids, names, or both.
///
/// All-id teams sort numerically: `[3, 1, 2]` becomes `"1-2-3"`. As soon as a
/// name is involved every member is compared by its string form.
pub fn team_key(members: &[Option<TeamMember>]) -> String {
    let present: Vec<&TeamMember> = members.iter().flatten().collect();

    let ids: Option<Vec<Option<PlayerId>>> = present
        .iter()
        .map(|m| match m {
            TeamMember::Id(id) => Some(Some(*id)),
            TeamMember::Name(_) => None,
        })
        .collect();
    if let Some(ids) = ids {
        return format_team(&ids);
    }

    let mut keys: Vec<String> = present.iter().map(|m| m.to_string()).collect();
    keys.sort();
    keys.dedup();
    keys.join(TEAM_KEY_SEPARATOR)
}
