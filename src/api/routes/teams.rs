use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::team_performance;
use crate::models::TeamStat;
use crate::season::{resolve_season, SeasonFilter};

const DEFAULT_TEAM_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct TeamsParams {
    pub season: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub season: SeasonFilter,
    pub teams: Vec<TeamStat>,
}

pub async fn team_stats(
    State(state): State<AppState>,
    Query(params): Query<TeamsParams>,
) -> Result<Json<TeamsResponse>, ApiError> {
    let limit = match params.limit.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TEAM_LIMIT,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid limit parameter: {}", raw)))?,
    };
    let season = resolve_season(&state.db, params.season.as_deref(), state.today()).await?;

    let players = state.db.list_players().await?;
    let matches = state.db.load_matches(season.season_id()).await?;
    let names: HashMap<_, _> = players.into_iter().map(|p| (p.id, p.name)).collect();

    let mut teams = team_performance(&matches, &names);
    teams.truncate(limit);

    Ok(Json(TeamsResponse { season, teams }))
}
