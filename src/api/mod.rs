//! REST API endpoints.
//!
//! Axum-based HTTP API for managing players, matches and seasons and for
//! querying derived statistics.

pub mod routes;
pub mod state;

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::models::{parse_row_id, MatchValidationError, SeasonValidationError};
use crate::season::SeasonError;
use crate::storage::StorageError;
use crate::summary::SummaryError;

use self::routes::{health, matches, players, seasons, stats, summary, teams};
use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SeasonError> for ApiError {
    fn from(err: SeasonError) -> Self {
        match err {
            SeasonError::InvalidParameter(_) => ApiError::BadRequest(err.to_string()),
            SeasonError::NotFound => ApiError::NotFound(err.to_string()),
            SeasonError::Storage(e) => e.into(),
        }
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<MatchValidationError> for ApiError {
    fn from(err: MatchValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<SeasonValidationError> for ApiError {
    fn from(err: SeasonValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Parse an optional id query parameter such as `playerId`.
pub(crate) fn parse_id_param(raw: Option<&str>, name: &str) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_row_id(value)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid {} parameter: {}", name, value))),
    }
}

/// Parse an id taken from the request path.
pub(crate) fn parse_path_id(raw: &str, entity: &str) -> Result<i64, ApiError> {
    parse_row_id(raw).ok_or_else(|| ApiError::BadRequest(format!("Invalid {} id: {}", entity, raw)))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Ignoring invalid CORS origin {:?}", origin);
            layer
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/players", get(players::list_players).post(players::create_player))
        .route(
            "/api/players/:id",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
        .route("/api/players/:id/stats", get(players::player_stats))
        .route("/api/matches", get(matches::list_matches).post(matches::create_match))
        .route("/api/matches/:id", axum::routing::delete(matches::delete_match))
        .route("/api/seasons", get(seasons::list_seasons).post(seasons::create_season))
        .route("/api/seasons/current", get(seasons::current_season))
        .route("/api/stats", get(stats::league_stats))
        .route("/api/teams", get(teams::team_stats))
        .route("/api/summary", get(summary::daily_summary))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_error_body_shape() {
        let resp = ApiError::NotFound("Season not found".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Season not found" }));
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let resp = ApiError::Internal("disk I/O error".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn test_season_error_mapping() {
        assert!(matches!(
            ApiError::from(SeasonError::InvalidParameter("x".to_string())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(ApiError::from(SeasonError::NotFound), ApiError::NotFound(_)));
    }

    #[test]
    fn test_parse_id_param() {
        assert_eq!(parse_id_param(None, "playerId").unwrap(), None);
        assert_eq!(parse_id_param(Some(" 7 "), "playerId").unwrap(), Some(7));
        let err = parse_id_param(Some("abc"), "playerId").unwrap_err();
        assert_eq!(err.to_string(), "Invalid playerId parameter: abc");
        assert!(parse_path_id("0", "player").is_err());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (state, _) = test_state();
        let (status, _) = get_json(app(&state), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
