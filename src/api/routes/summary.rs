use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::summary::SummaryOutcome;

pub async fn daily_summary(State(state): State<AppState>) -> Result<Json<SummaryOutcome>, ApiError> {
    let outcome = state.summaries.get_or_generate(state.today()).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use crate::summary::NO_MATCHES_SUMMARY;
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_summary_is_cached_for_the_day() {
        let (state, backend) = test_state();
        seed_league(&state.db).await;

        let (status, first) = get_json(app(&state), "/api/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["cached"], false);
        assert_eq!(first["lastMatchId"], 3);

        let (_, second) = get_json(app(&state), "/api/summary").await;
        assert_eq!(second["cached"], true);
        assert_eq!(first["summary"], second["summary"]);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_summary_without_matches() {
        let (state, backend) = test_state();
        let (status, json) = get_json(app(&state), "/api/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["summary"], NO_MATCHES_SUMMARY);
        assert_eq!(backend.calls(), 0);
    }
}
