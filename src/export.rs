//! JSON snapshot of the whole league, for backups and hand-offs.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Match, Player, Season};
use crate::storage::{Database, StorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueExport {
    pub exported_at: DateTime<Utc>,
    pub players: Vec<Player>,
    pub seasons: Vec<Season>,
    /// Oldest first
    pub matches: Vec<Match>,
}

pub async fn export_league(db: &Database) -> Result<LeagueExport, StorageError> {
    Ok(LeagueExport {
        exported_at: Utc::now(),
        players: db.list_players().await?,
        seasons: db.list_seasons().await?,
        matches: db.load_matches(None).await?,
    })
}

/// Write the snapshot as pretty-printed JSON, creating parent directories.
pub fn write_export(export: &LeagueExport, path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(export)?;
    std::fs::write(path, json)?;
    info!(
        "Exported {} players, {} seasons, {} matches to {}",
        export.players.len(),
        export.seasons.len(),
        export.matches.len(),
        path.display()
    );
    Ok(())
}
