use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::routes::stats::season_stats;
use crate::api::state::AppState;
use crate::api::{parse_path_id, ApiError};
use crate::calculate::{compute_player_stats, StatsContext};
use crate::models::{normalize_player_name, NewPlayer, Player, PlayerId, PlayerStats, UpdatePlayer};
use crate::season::resolve_season;

#[derive(Debug, Deserialize)]
pub struct ListPlayersParams {
    /// `true` to include statistics
    pub stats: Option<String>,
    pub season: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerStatsParams {
    pub season: Option<String>,
}

/// Player list, with or without statistics.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlayerListResponse {
    Players(Vec<Player>),
    Stats(Vec<PlayerStats>),
}

fn wants_stats(raw: Option<&str>) -> Result<bool, ApiError> {
    match raw.map(str::trim) {
        None | Some("") | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Invalid stats parameter: {}",
            other
        ))),
    }
}

async fn require_player(state: &AppState, id: PlayerId) -> Result<Player, ApiError> {
    state
        .db
        .get_player(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<ListPlayersParams>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    if !wants_stats(params.stats.as_deref())? {
        return Ok(Json(PlayerListResponse::Players(state.db.list_players().await?)));
    }

    let season = resolve_season(&state.db, params.season.as_deref(), state.today()).await?;
    let stats = season_stats(&state, &season).await?;
    Ok(Json(PlayerListResponse::Stats(stats)))
}

pub async fn create_player(
    State(state): State<AppState>,
    body: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let Json(body) = body?;
    let name = normalize_player_name(&body.name)
        .ok_or_else(|| ApiError::BadRequest("Player name is required".to_string()))?;

    let player = state.db.create_player(&name, body.start_year).await?;
    info!("Created player {} ({})", player.name, player.id);
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_path_id(&id, "player")?;
    Ok(Json(require_player(&state, id).await?))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdatePlayer>, JsonRejection>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_path_id(&id, "player")?;
    let Json(body) = body?;

    let name = match body.name.as_deref() {
        Some(raw) => Some(
            normalize_player_name(raw)
                .ok_or_else(|| ApiError::BadRequest("Player name is required".to_string()))?,
        ),
        None => None,
    };

    state
        .db
        .update_player(id, name.as_deref(), body.start_year)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&id, "player")?;
    let player = require_player(&state, id).await?;

    let played = state.db.count_matches_for_player(id).await?;
    if played > 0 {
        return Err(ApiError::BadRequest(format!(
            "Cannot delete {}: player has {} recorded matches",
            player.name, played
        )));
    }

    state.db.delete_player(id).await?;
    info!("Deleted player {} ({})", player.name, id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn player_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PlayerStatsParams>,
) -> Result<Json<PlayerStats>, ApiError> {
    let id = parse_path_id(&id, "player")?;
    let season = resolve_season(&state.db, params.season.as_deref(), state.today()).await?;
    let player = require_player(&state, id).await?;

    let matches = state.db.load_matches(season.season_id()).await?;
    let ctx = StatsContext::new(season.window(), state.today(), state.policy());
    Ok(Json(compute_player_stats(&player, &matches, &ctx)))
}
