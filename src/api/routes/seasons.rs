use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{NewSeason, Season};

pub async fn list_seasons(State(state): State<AppState>) -> Result<Json<Vec<Season>>, ApiError> {
    Ok(Json(state.db.list_seasons().await?))
}

/// The active season, created for the current quarter if none is active.
pub async fn current_season(State(state): State<AppState>) -> Result<Json<Season>, ApiError> {
    Ok(Json(state.db.ensure_active_season(state.today()).await?))
}

pub async fn create_season(
    State(state): State<AppState>,
    body: Result<Json<NewSeason>, JsonRejection>,
) -> Result<(StatusCode, Json<Season>), ApiError> {
    let Json(body) = body?;
    body.validate()?;

    let season = state.db.create_season(&body).await?;
    info!(
        "Created season {} ({} to {}, active: {})",
        season.name, season.start_date, season.end_date, season.is_active
    );
    Ok((StatusCode::CREATED, Json(season)))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_current_season_is_created_once() {
        let (state, _) = test_state();
        let (status, first) = get_json(app(&state), "/api/seasons/current").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["isActive"], true);
        assert!(first["name"].as_str().unwrap().starts_with('Q'));

        let (_, second) = get_json(app(&state), "/api/seasons/current").await;
        assert_eq!(first["id"], second["id"]);

        let (_, all) = get_json(app(&state), "/api/seasons").await;
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_active_season_deactivates_others() {
        let (state, _) = test_state();
        let (_, current) = get_json(app(&state), "/api/seasons/current").await;

        let (status, created) = post_json(
            app(&state),
            "/api/seasons",
            json!({
                "name": "Spring League",
                "startDate": "2026-03-01",
                "endDate": "2026-05-31",
                "isActive": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["isActive"], true);

        let (_, all) = get_json(app(&state), "/api/seasons").await;
        let active: Vec<_> = all
            .as_array()
            .unwrap()
            .iter()
            .filter(|s| s["isActive"] == true)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0]["id"], created["id"]);
        assert_ne!(created["id"], current["id"]);
    }

    #[tokio::test]
    async fn test_create_season_validation() {
        let (state, _) = test_state();
        let (status, json) = post_json(
            app(&state),
            "/api/seasons",
            json!({ "name": "Backwards", "startDate": "2025-06-01", "endDate": "2025-05-01" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            json!({ "error": "Season end date must not be before its start date" })
        );

        let (status, _) = post_json(
            app(&state),
            "/api/seasons",
            json!({ "name": "Bad", "startDate": "not-a-date", "endDate": "2025-05-01" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = post_json(
            app(&state),
            "/api/seasons",
            json!({ "name": " ", "startDate": "2025-06-01", "endDate": "2025-08-31" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "Season name is required" }));
    }
}
