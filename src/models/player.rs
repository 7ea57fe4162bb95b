//! League player model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::PlayerId;

/// A league player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Row id; the player's identity
    pub id: PlayerId,

    /// Display name (mutable)
    pub name: String,

    /// Year the player joined the league
    pub start_year: Option<i32>,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a player.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub start_year: Option<i32>,
}

/// Request body for updating a player.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayer {
    #[serde(default)]
    pub name: Option<String>,

    /// Absent leaves the year alone; `null` clears it
    #[serde(default, deserialize_with = "present_field")]
    pub start_year: Option<Option<i32>>,
}

/// Distinguish an explicit `null` from a missing field: any value that
/// reaches the deserializer, `null` included, is wrapped in `Some`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Trim a submitted player name, rejecting blank names.
pub fn normalize_player_name(raw: &str) -> Option<String> {
    let trimmed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
