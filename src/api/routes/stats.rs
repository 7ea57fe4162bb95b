use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::{parse_id_param, ApiError};
use crate::calculate::{compute_all_stats, StatsContext};
use crate::models::PlayerStats;
use crate::season::{resolve_season, SeasonFilter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub season: Option<String>,
    pub player_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub season: SeasonFilter,
    pub players: Vec<PlayerStats>,
}

/// Stats for every player over the resolved season.
pub(crate) async fn season_stats(
    state: &AppState,
    filter: &SeasonFilter,
) -> Result<Vec<PlayerStats>, ApiError> {
    let players = state.db.list_players().await?;
    let matches = state.db.load_matches(filter.season_id()).await?;
    debug!(
        "Computing stats for {} players over {} matches",
        players.len(),
        matches.len()
    );

    let ctx = StatsContext::new(filter.window(), state.today(), state.policy());
    Ok(compute_all_stats(&players, &matches, &ctx))
}

pub async fn league_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let player_id = parse_id_param(params.player_id.as_deref(), "playerId")?;
    let season = resolve_season(&state.db, params.season.as_deref(), state.today()).await?;

    if let Some(id) = player_id {
        if state.db.get_player(id).await?.is_none() {
            return Err(ApiError::NotFound("Player not found".to_string()));
        }
    }

    let mut players = season_stats(&state, &season).await?;
    if let Some(id) = player_id {
        players.retain(|p| p.id == id);
    }

    Ok(Json(StatsResponse { season, players }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_season_is_404() {
        let (state, _) = test_state();
        seed_league(&state.db).await;

        let (status, json) = get_json(app(&state), "/api/stats?season=9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "Season not found" }));
    }

    #[tokio::test]
    async fn test_unknown_season_never_reads_matches() {
        let (state, _) = test_state();
        seed_league(&state.db).await;
        state.db.execute_batch("DROP TABLE matches;").await.unwrap();

        for uri in ["/api/stats?season=9999", "/api/stats?season=0", "/api/teams?season=9999"] {
            let (status, json) = get_json(app(&state), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(json, json!({ "error": "Season not found" }));
        }

        // A request that does reach the match table fails
        let (status, json) = get_json(app(&state), "/api/stats?season=lifetime").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_invalid_season_is_400() {
        let (state, _) = test_state();
        let (status, json) = get_json(app(&state), "/api/stats?season=invalid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Invalid season parameter"));
    }

    #[tokio::test]
    async fn test_season_scoped_fixture() {
        let (state, _) = test_state();
        let seeded = seed_league(&state.db).await;

        let uri = format!("/api/stats?season={}&playerId={}", seeded.late_q3, seeded.alice);
        let (status, json) = get_json(app(&state), &uri).await;
        assert_eq!(status, StatusCode::OK);

        let alice = &json["players"][0];
        assert_eq!(json["players"].as_array().unwrap().len(), 1);
        assert_eq!(alice["name"], "Alice");
        assert_eq!(alice["record"]["gamesWon"], 4);
        assert_eq!(alice["record"]["gamesLost"], 1);
        assert_eq!(alice["record"]["totalGames"], 5);
        assert_eq!(alice["record"]["wins"], 1);
        assert_eq!(alice["record"]["losses"], 0);
        assert_eq!(alice["winPercentage"], 100);
        assert_eq!(json["season"]["kind"], "season");
        assert_eq!(json["season"]["startDate"], "2025-09-15");
    }

    #[tokio::test]
    async fn test_lifetime_includes_every_match() {
        let (state, _) = test_state();
        let seeded = seed_league(&state.db).await;

        let (status, json) = get_json(app(&state), "/api/stats?season=lifetime").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["season"], json!({ "kind": "lifetime" }));

        let players = json["players"].as_array().unwrap();
        let bob = players
            .iter()
            .find(|p| p["id"] == json!(seeded.bob))
            .unwrap();
        assert_eq!(bob["record"]["wins"], 1);
        assert_eq!(bob["record"]["losses"], 2);
        assert_eq!(bob["record"]["gamesWon"], 5);
        assert_eq!(bob["record"]["totalGames"], 14);
    }

    #[tokio::test]
    async fn test_empty_season_zeroes_everyone() {
        let (state, _) = test_state();
        seed_league(&state.db).await;
        let (_, season) = post_json(
            app(&state),
            "/api/seasons",
            json!({ "name": "Winter", "startDate": "2024-12-01", "endDate": "2025-02-28" }),
        )
        .await;

        let uri = format!("/api/stats?season={}", season["id"]);
        let (status, json) = get_json(app(&state), &uri).await;
        assert_eq!(status, StatusCode::OK);
        for p in json["players"].as_array().unwrap() {
            assert_eq!(p["record"]["wins"], 0);
            assert_eq!(p["record"]["losses"], 0);
            assert_eq!(p["streak"], json!({ "type": "wins", "count": 0 }));
            assert_eq!(p["winPercentage"], 0);
        }
    }

    #[tokio::test]
    async fn test_unknown_player_is_404() {
        let (state, _) = test_state();
        let (status, json) = get_json(app(&state), "/api/stats?playerId=42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "Player not found" }));
    }
}
