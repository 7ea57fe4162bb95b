//! SQLite schema and queries.
//!
//! Every function takes a borrowed connection so callers decide how the
//! connection is shared. Timestamps and dates are stored as text through
//! rusqlite's chrono support, which keeps lexical and chronological order
//! identical.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::StorageError;
use crate::models::{
    CalendarQuarter, DailySummary, Match, MatchId, NewSeason, Player, PlayerId, Season, SeasonId,
    ValidatedMatch,
};

/// Create tables and indexes if they do not exist yet.
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            start_year INTEGER NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS seasons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_seasons_single_active
            ON seasons(is_active) WHERE is_active = 1;

        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            team_one_p1 INTEGER NOT NULL,
            team_one_p2 INTEGER NULL,
            team_one_p3 INTEGER NULL,
            team_two_p1 INTEGER NOT NULL,
            team_two_p2 INTEGER NULL,
            team_two_p3 INTEGER NULL,
            team_one_games_won INTEGER NOT NULL CHECK (team_one_games_won >= 0),
            team_two_games_won INTEGER NOT NULL CHECK (team_two_games_won >= 0),
            date TEXT NOT NULL,
            season_id INTEGER NULL REFERENCES seasons(id) ON DELETE SET NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(date);
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(season_id);

        CREATE TABLE IF NOT EXISTS daily_summaries (
            date TEXT PRIMARY KEY,
            last_match_id INTEGER NOT NULL,
            summary TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// ── Players ─────────────────────────────────────────────────────

const PLAYER_COLUMNS: &str = "id, name, start_year, created_at";

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        start_year: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn list_players(conn: &Connection) -> Result<Vec<Player>, StorageError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players ORDER BY name ASC, id ASC"
    ))?;
    let rows = stmt.query_map([], player_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get_player(conn: &Connection, id: PlayerId) -> Result<Option<Player>, StorageError> {
    let player = conn
        .query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
            params![id],
            player_from_row,
        )
        .optional()?;
    Ok(player)
}

pub fn insert_player(
    conn: &Connection,
    name: &str,
    start_year: Option<i32>,
    now: DateTime<Utc>,
) -> Result<Player, StorageError> {
    conn.execute(
        "INSERT INTO players (name, start_year, created_at) VALUES (?1, ?2, ?3)",
        params![name, start_year, now],
    )
    .map_err(|e| {
        if is_constraint_violation(&e) {
            StorageError::Duplicate(format!("A player named {} already exists", name))
        } else {
            e.into()
        }
    })?;

    Ok(Player {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        start_year,
        created_at: now,
    })
}

/// Apply a partial update. `start_year` is `None` to keep the stored year
/// and `Some(None)` to clear it.
pub fn update_player(
    conn: &Connection,
    id: PlayerId,
    name: Option<&str>,
    start_year: Option<Option<i32>>,
) -> Result<Option<Player>, StorageError> {
    let updated = conn
        .execute(
            "UPDATE players
             SET name = COALESCE(?1, name),
                 start_year = CASE WHEN ?2 THEN ?3 ELSE start_year END
             WHERE id = ?4",
            params![name, start_year.is_some(), start_year.flatten(), id],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StorageError::Duplicate(format!(
                    "A player named {} already exists",
                    name.unwrap_or_default()
                ))
            } else {
                e.into()
            }
        })?;

    if updated == 0 {
        return Ok(None);
    }
    get_player(conn, id)
}

pub fn delete_player(conn: &Connection, id: PlayerId) -> Result<bool, StorageError> {
    let deleted = conn.execute("DELETE FROM players WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Ids from `ids` that have no player row.
pub fn missing_player_ids(conn: &Connection, ids: &[PlayerId]) -> Result<Vec<PlayerId>, StorageError> {
    let mut stmt = conn.prepare("SELECT 1 FROM players WHERE id = ?1")?;
    let mut missing = Vec::new();
    for id in ids {
        if !stmt.exists(params![id])? {
            missing.push(*id);
        }
    }
    Ok(missing)
}

// ── Matches ─────────────────────────────────────────────────────

const MATCH_COLUMNS: &str = "id, team_one_p1, team_one_p2, team_one_p3, \
     team_two_p1, team_two_p2, team_two_p3, \
     team_one_games_won, team_two_games_won, date, season_id";

const PLAYER_IN_MATCH: &str =
    "?2 IN (team_one_p1, team_one_p2, team_one_p3, team_two_p1, team_two_p2, team_two_p3)";

fn match_from_row(row: &Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        team_one_player_ids: [row.get(1)?, row.get(2)?, row.get(3)?],
        team_two_player_ids: [row.get(4)?, row.get(5)?, row.get(6)?],
        team_one_games_won: row.get(7)?,
        team_two_games_won: row.get(8)?,
        date: row.get(9)?,
        season_id: row.get(10)?,
    })
}

/// Filter for match listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchQuery {
    pub season_id: Option<SeasonId>,
    pub player_id: Option<PlayerId>,
    pub limit: Option<u32>,
}

/// Match corpus for aggregation, oldest first.
///
/// `None` loads every match, including those without a season.
pub fn load_matches(conn: &Connection, season_id: Option<SeasonId>) -> Result<Vec<Match>, StorageError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches
         WHERE (?1 IS NULL OR season_id = ?1)
         ORDER BY date ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![season_id], match_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    debug!("Loaded {} matches (season: {:?})", out.len(), season_id);
    Ok(out)
}

/// Match listing, newest first.
pub fn list_matches(conn: &Connection, query: &MatchQuery) -> Result<Vec<Match>, StorageError> {
    let limit = query.limit.map_or(-1, i64::from);
    let mut stmt = conn.prepare(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches
         WHERE (?1 IS NULL OR season_id = ?1)
           AND (?2 IS NULL OR {PLAYER_IN_MATCH})
         ORDER BY date DESC, id DESC
         LIMIT ?3"
    ))?;
    let rows = stmt.query_map(params![query.season_id, query.player_id, limit], match_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn insert_match(conn: &Connection, m: &ValidatedMatch) -> Result<Match, StorageError> {
    let [one_a, one_b, one_c] = m.team_one_player_ids;
    let [two_a, two_b, two_c] = m.team_two_player_ids;
    conn.execute(
        "INSERT INTO matches (
            team_one_p1, team_one_p2, team_one_p3,
            team_two_p1, team_two_p2, team_two_p3,
            team_one_games_won, team_two_games_won, date, season_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            one_a,
            one_b,
            one_c,
            two_a,
            two_b,
            two_c,
            m.team_one_games_won,
            m.team_two_games_won,
            m.date,
            m.season_id,
        ],
    )?;

    Ok(Match {
        id: conn.last_insert_rowid(),
        team_one_player_ids: m.team_one_player_ids,
        team_two_player_ids: m.team_two_player_ids,
        team_one_games_won: m.team_one_games_won,
        team_two_games_won: m.team_two_games_won,
        date: m.date,
        season_id: m.season_id,
    })
}

pub fn delete_match(conn: &Connection, id: MatchId) -> Result<bool, StorageError> {
    let deleted = conn.execute("DELETE FROM matches WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn count_matches_for_player(conn: &Connection, player_id: PlayerId) -> Result<u32, StorageError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM matches
         WHERE ?1 IN (team_one_p1, team_one_p2, team_one_p3, team_two_p1, team_two_p2, team_two_p3)",
        params![player_id],
        |row| row.get(0),
    )?;
    Ok(count as u32)
}

/// Highest match id, or `None` when no match has been recorded.
pub fn max_match_id(conn: &Connection) -> Result<Option<MatchId>, StorageError> {
    let id = conn.query_row("SELECT MAX(id) FROM matches", [], |row| {
        row.get::<_, Option<i64>>(0)
    })?;
    Ok(id)
}

// ── Seasons ─────────────────────────────────────────────────────

const SEASON_COLUMNS: &str = "id, name, start_date, end_date, is_active, created_at";

fn season_from_row(row: &Row<'_>) -> rusqlite::Result<Season> {
    Ok(Season {
        id: row.get(0)?,
        name: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn list_seasons(conn: &Connection) -> Result<Vec<Season>, StorageError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SEASON_COLUMNS} FROM seasons ORDER BY start_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], season_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get_season(conn: &Connection, id: SeasonId) -> Result<Option<Season>, StorageError> {
    let season = conn
        .query_row(
            &format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE id = ?1"),
            params![id],
            season_from_row,
        )
        .optional()?;
    Ok(season)
}

pub fn active_season(conn: &Connection) -> Result<Option<Season>, StorageError> {
    let season = conn
        .query_row(
            &format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE is_active = 1 LIMIT 1"),
            [],
            season_from_row,
        )
        .optional()?;
    Ok(season)
}

/// Season whose date range contains `date`, preferring the active one.
pub fn season_for_date(conn: &Connection, date: NaiveDate) -> Result<Option<Season>, StorageError> {
    let season = conn
        .query_row(
            &format!(
                "SELECT {SEASON_COLUMNS} FROM seasons
                 WHERE start_date <= ?1 AND end_date >= ?1
                 ORDER BY is_active DESC, id DESC
                 LIMIT 1"
            ),
            params![date],
            season_from_row,
        )
        .optional()?;
    Ok(season)
}

/// Insert a season. An active season deactivates any other first.
pub fn insert_season(
    conn: &mut Connection,
    season: &NewSeason,
    now: DateTime<Utc>,
) -> Result<Season, StorageError> {
    let tx = conn.transaction()?;
    if season.is_active {
        tx.execute("UPDATE seasons SET is_active = 0 WHERE is_active = 1", [])?;
    }
    tx.execute(
        "INSERT INTO seasons (name, start_date, end_date, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            season.name.trim(),
            season.start_date,
            season.end_date,
            season.is_active,
            now
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Season {
        id,
        name: season.name.trim().to_string(),
        start_date: season.start_date,
        end_date: season.end_date,
        is_active: season.is_active,
        created_at: now,
    })
}

/// Return the active season, creating one for `quarter` if none exists.
///
/// The insert is ignored when another writer created an active season in
/// the meantime; the single-active unique index makes this idempotent.
pub fn ensure_active_season(
    conn: &Connection,
    quarter: CalendarQuarter,
    now: DateTime<Utc>,
) -> Result<Season, StorageError> {
    if let Some(season) = active_season(conn)? {
        return Ok(season);
    }

    let season = quarter.as_new_season();
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO seasons (name, start_date, end_date, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![season.name, season.start_date, season.end_date, season.is_active, now],
    )?;
    if inserted > 0 {
        info!(
            "Created season {} ({} to {})",
            season.name, season.start_date, season.end_date
        );
    }

    active_season(conn)?
        .ok_or_else(|| StorageError::InvalidRow("active season missing after insert".to_string()))
}

// ── Daily summaries ─────────────────────────────────────────────

pub fn get_daily_summary(conn: &Connection, date_key: &str) -> Result<Option<DailySummary>, StorageError> {
    let summary = conn
        .query_row(
            "SELECT date, last_match_id, summary, created_at FROM daily_summaries WHERE date = ?1",
            params![date_key],
            |row| {
                Ok(DailySummary {
                    date: row.get(0)?,
                    last_match_id: row.get(1)?,
                    summary: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(summary)
}

/// Insert or replace the summary for a day.
pub fn upsert_daily_summary(conn: &Connection, summary: &DailySummary) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO daily_summaries (date, last_match_id, summary, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(date) DO UPDATE SET
            last_match_id = excluded.last_match_id,
            summary = excluded.summary,
            created_at = excluded.created_at",
        params![
            summary.date,
            summary.last_match_id,
            summary.summary,
            summary.created_at
        ],
    )?;
    Ok(())
}
