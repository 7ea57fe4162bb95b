//! Daily summary cache.
//!
//! One generated summary is kept per calendar day, tagged with the highest
//! match id it covered. A cached row is served while no newer match exists;
//! otherwise a fresh summary is generated and replaces it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::agents::{Agent, AgentError, AiBackend, SummaryWriterAgent, SummaryWriterInput};
use crate::calculate::{compute_all_stats, InactivityPolicy, StatsContext};
use crate::models::{date_key, DailySummary, MatchId};
use crate::storage::{Database, MatchQuery, StorageError};

/// Text served when the league has no matches yet.
pub const NO_MATCHES_SUMMARY: &str = "No matches have been played yet.";

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Summary generation failed: {0}")]
    Generation(#[from] AgentError),
}

/// Summary returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutcome {
    pub date: String,
    pub summary: String,
    pub last_match_id: Option<MatchId>,
    /// Served from the stored row without calling the generator
    pub cached: bool,
}

/// Read-through cache in front of the summary writer.
#[derive(Clone)]
pub struct DailySummaryCache {
    db: Database,
    backend: Arc<dyn AiBackend>,
    policy: InactivityPolicy,
    recent_matches: u32,
}

impl DailySummaryCache {
    pub fn new(
        db: Database,
        backend: Arc<dyn AiBackend>,
        policy: InactivityPolicy,
        recent_matches: u32,
    ) -> Self {
        Self {
            db,
            backend,
            policy,
            recent_matches,
        }
    }

    /// Today's summary, generating it if the cached row is missing or stale.
    ///
    /// Two concurrent stale reads may both generate; the last upsert wins.
    pub async fn get_or_generate(&self, today: NaiveDate) -> Result<SummaryOutcome, SummaryError> {
        let key = date_key(today);

        let Some(last_match_id) = self.db.max_match_id().await? else {
            debug!("No matches recorded, skipping summary generation");
            return Ok(SummaryOutcome {
                date: key,
                summary: NO_MATCHES_SUMMARY.to_string(),
                last_match_id: None,
                cached: false,
            });
        };

        if let Some(row) = self.db.get_daily_summary(&key).await? {
            if row.last_match_id == last_match_id {
                debug!("Serving cached summary for {}", key);
                return Ok(SummaryOutcome {
                    date: row.date,
                    summary: row.summary,
                    last_match_id: Some(row.last_match_id),
                    cached: true,
                });
            }
            info!(
                "Summary for {} is stale (covers match {}, latest is {})",
                key, row.last_match_id, last_match_id
            );
        }

        let input = self.writer_input(today).await?;
        let summary = SummaryWriterAgent::new(self.backend.clone())
            .execute(input)
            .await?;

        let row = DailySummary {
            date: key,
            last_match_id,
            summary,
            created_at: Utc::now(),
        };
        self.db.upsert_daily_summary(&row).await?;

        Ok(SummaryOutcome {
            date: row.date,
            summary: row.summary,
            last_match_id: Some(last_match_id),
            cached: false,
        })
    }

    async fn writer_input(&self, today: NaiveDate) -> Result<SummaryWriterInput, StorageError> {
        let players = self.db.list_players().await?;
        let matches = self.db.load_matches(None).await?;
        let recent_matches = self
            .db
            .list_matches(MatchQuery {
                limit: Some(self.recent_matches),
                ..Default::default()
            })
            .await?;

        let ctx = StatsContext::new(None, today, self.policy);
        let standings = compute_all_stats(&players, &matches, &ctx);
        let names: HashMap<_, _> = players.into_iter().map(|p| (p.id, p.name)).collect();

        Ok(SummaryWriterInput {
            date: today,
            recent_matches,
            standings,
            names,
        })
    }
}
