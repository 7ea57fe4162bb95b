use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::{parse_id_param, parse_path_id, ApiError};
use crate::models::{Match, NewMatch};
use crate::season::resolve_season;
use crate::storage::MatchQuery;

const MAX_LIST_LIMIT: u32 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMatchesParams {
    pub season: Option<String>,
    pub player_id: Option<String>,
    pub limit: Option<String>,
}

fn parse_limit(raw: Option<&str>) -> Result<Option<u32>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .map(|n| Some(n.min(MAX_LIST_LIMIT)))
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid limit parameter: {}", value))),
    }
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let player_id = parse_id_param(params.player_id.as_deref(), "playerId")?;
    let limit = parse_limit(params.limit.as_deref())?;
    let season = resolve_season(&state.db, params.season.as_deref(), state.today()).await?;

    let matches = state
        .db
        .list_matches(MatchQuery {
            season_id: season.season_id(),
            player_id,
            limit,
        })
        .await?;
    Ok(Json(matches))
}

pub async fn create_match(
    State(state): State<AppState>,
    body: Result<Json<NewMatch>, JsonRejection>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let Json(body) = body?;
    let mut validated = body.validate(Utc::now())?;

    let ids: Vec<_> = validated.player_ids().collect();
    if !state.db.missing_player_ids(&ids).await?.is_empty() {
        return Err(ApiError::NotFound("Player not found".to_string()));
    }

    match validated.season_id {
        Some(id) => {
            if state.db.get_season(id).await?.is_none() {
                return Err(ApiError::NotFound("Season not found".to_string()));
            }
        }
        None => {
            validated.season_id = state
                .db
                .season_for_date(validated.date.date_naive())
                .await?
                .map(|s| s.id);
        }
    }

    let created = state.db.insert_match(&validated).await?;
    info!(
        "Recorded match {} ({}-{}, season {:?})",
        created.id, created.team_one_games_won, created.team_two_games_won, created.season_id
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_path_id(&id, "match")?;
    if !state.db.delete_match(id).await? {
        return Err(ApiError::NotFound("Match not found".to_string()));
    }
    info!("Deleted match {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), None);
        assert_eq!(parse_limit(Some("5")).unwrap(), Some(5));
        assert_eq!(parse_limit(Some("100000")).unwrap(), Some(MAX_LIST_LIMIT));
        assert!(parse_limit(Some("0")).is_err());
        assert!(parse_limit(Some("-1")).is_err());
    }

    #[tokio::test]
    async fn test_create_match_assigns_season_by_date() {
        let (state, _) = test_state();
        let seeded = seed_league(&state.db).await;

        let (status, json) = post_json(
            app(&state),
            "/api/matches",
            json!({
                "teamOnePlayerIds": [seeded.bob, null, null],
                "teamTwoPlayerIds": [seeded.alice],
                "teamOneGamesWon": 2,
                "teamTwoGamesWon": 2,
                "date": "2025-09-25"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["seasonId"], seeded.late_q3);
        assert_eq!(json["teamOnePlayerIds"], json!([seeded.bob, null, null]));

        let (_, outside) = post_json(
            app(&state),
            "/api/matches",
            json!({
                "teamOnePlayerIds": [seeded.bob],
                "teamTwoPlayerIds": [seeded.alice],
                "teamOneGamesWon": 1,
                "teamTwoGamesWon": 0,
                "date": "2025-10-02"
            }),
        )
        .await;
        assert_eq!(outside["seasonId"], json!(null));
    }

    #[tokio::test]
    async fn test_create_match_validation() {
        let (state, _) = test_state();
        let seeded = seed_league(&state.db).await;

        let cases = [
            (
                json!({ "teamOnePlayerIds": [seeded.alice], "teamTwoPlayerIds": [seeded.alice],
                        "teamOneGamesWon": 1, "teamTwoGamesWon": 0 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                json!({ "teamOnePlayerIds": [], "teamTwoPlayerIds": [seeded.bob],
                        "teamOneGamesWon": 1, "teamTwoGamesWon": 0 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                json!({ "teamOnePlayerIds": [seeded.alice], "teamTwoPlayerIds": [seeded.bob],
                        "teamOneGamesWon": -1, "teamTwoGamesWon": 0 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                json!({ "teamOnePlayerIds": [seeded.alice], "teamTwoPlayerIds": [404],
                        "teamOneGamesWon": 1, "teamTwoGamesWon": 0 }),
                StatusCode::NOT_FOUND,
            ),
            (
                json!({ "teamOnePlayerIds": [seeded.alice], "teamTwoPlayerIds": [seeded.bob],
                        "teamOneGamesWon": 1, "teamTwoGamesWon": 0, "seasonId": 9999 }),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (body, expected) in cases {
            let (status, json) = post_json(app(&state), "/api/matches", body.clone()).await;
            assert_eq!(status, expected, "{body}");
            assert!(json["error"].is_string());
        }

        let (_, all) = get_json(app(&state), "/api/matches").await;
        assert_eq!(all.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_match_rejects_oversized_score() {
        let (state, _) = test_state();
        let seeded = seed_league(&state.db).await;

        let (status, json) = post_json(
            app(&state),
            "/api/matches",
            json!({
                "teamOnePlayerIds": [seeded.alice],
                "teamTwoPlayerIds": [seeded.bob],
                "teamOneGamesWon": 4294967295u64,
                "teamTwoGamesWon": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Games won must be at most 65535, got 4294967295");

        let (status, stats) = get_json(app(&state), "/api/stats?season=lifetime").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["players"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_matches_filters() {
        let (state, _) = test_state();
        let seeded = seed_league(&state.db).await;

        let (status, all) = get_json(app(&state), "/api/matches").await;
        assert_eq!(status, StatusCode::OK);
        let dates: Vec<&str> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|m| &m["date"].as_str().unwrap()[..10])
            .collect();
        assert_eq!(dates, vec!["2025-09-20", "2025-08-09", "2025-07-05"]);

        let uri = format!("/api/matches?season={}", seeded.late_q3);
        let (_, season) = get_json(app(&state), &uri).await;
        assert_eq!(season.as_array().unwrap().len(), 1);

        let (_, limited) = get_json(app(&state), "/api/matches?limit=2").await;
        assert_eq!(limited.as_array().unwrap().len(), 2);

        let (status, _) = get_json(app(&state), "/api/matches?playerId=x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app(&state), "/api/matches?season=9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_match() {
        let (state, _) = test_state();
        seed_league(&state.db).await;

        let (status, _) = send(app(&state), "DELETE", "/api/matches/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, json) = send(app(&state), "DELETE", "/api/matches/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "Match not found" }));
    }
}
