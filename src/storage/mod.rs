//! SQLite-backed league storage.
//!
//! Handles persistence for:
//! - Players
//! - Matches
//! - Seasons
//! - Cached daily summaries

pub mod sqlite;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{
    CalendarQuarter, DailySummary, Match, MatchId, NewSeason, Player, PlayerId, Season, SeasonId,
    ValidatedMatch,
};

pub use sqlite::MatchQuery;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Duplicate(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

impl StorageConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self { database_path }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data/league.db"))
    }
}

/// Shared handle to the league database.
///
/// Cloning is cheap; all clones serialize through one connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        sqlite::init_schema(&conn)?;
        info!("Opened database at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::open(&config.database_path)
    }

    /// Fresh in-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        sqlite::init_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run raw SQL against the connection, for tests that need to break or
    /// inspect the schema.
    #[cfg(test)]
    pub(crate) async fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        conn.execute_batch(sql)?;
        Ok(())
    }

    // Players

    pub async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::list_players(&conn)
    }

    pub async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::get_player(&conn, id)
    }

    pub async fn create_player(&self, name: &str, start_year: Option<i32>) -> Result<Player, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::insert_player(&conn, name, start_year, Utc::now())
    }

    pub async fn update_player(
        &self,
        id: PlayerId,
        name: Option<&str>,
        start_year: Option<Option<i32>>,
    ) -> Result<Option<Player>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::update_player(&conn, id, name, start_year)
    }

    pub async fn delete_player(&self, id: PlayerId) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::delete_player(&conn, id)
    }

    pub async fn missing_player_ids(&self, ids: &[PlayerId]) -> Result<Vec<PlayerId>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::missing_player_ids(&conn, ids)
    }

    pub async fn count_matches_for_player(&self, id: PlayerId) -> Result<u32, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::count_matches_for_player(&conn, id)
    }

    // Matches

    pub async fn load_matches(&self, season_id: Option<SeasonId>) -> Result<Vec<Match>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::load_matches(&conn, season_id)
    }

    pub async fn list_matches(&self, query: MatchQuery) -> Result<Vec<Match>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::list_matches(&conn, &query)
    }

    pub async fn insert_match(&self, m: &ValidatedMatch) -> Result<Match, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::insert_match(&conn, m)
    }

    pub async fn delete_match(&self, id: MatchId) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::delete_match(&conn, id)
    }

    pub async fn max_match_id(&self) -> Result<Option<MatchId>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::max_match_id(&conn)
    }

    // Seasons

    pub async fn list_seasons(&self) -> Result<Vec<Season>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::list_seasons(&conn)
    }

    pub async fn get_season(&self, id: SeasonId) -> Result<Option<Season>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::get_season(&conn, id)
    }

    pub async fn season_for_date(&self, date: NaiveDate) -> Result<Option<Season>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::season_for_date(&conn, date)
    }

    pub async fn create_season(&self, season: &NewSeason) -> Result<Season, StorageError> {
        let mut conn = self.conn.lock().await;
        sqlite::insert_season(&mut conn, season, Utc::now())
    }

    /// The active season, created for the quarter containing `today` if
    /// none exists yet.
    pub async fn ensure_active_season(&self, today: NaiveDate) -> Result<Season, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::ensure_active_season(&conn, CalendarQuarter::containing(today), Utc::now())
    }

    // Daily summaries

    pub async fn get_daily_summary(&self, date_key: &str) -> Result<Option<DailySummary>, StorageError> {
        let conn = self.conn.lock().await;
        sqlite::get_daily_summary(&conn, date_key)
    }

    pub async fn upsert_daily_summary(&self, summary: &DailySummary) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        sqlite::upsert_daily_summary(&conn, summary)
    }
}
