use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::agents::backend::AiBackend;
use crate::calculate::InactivityPolicy;
use crate::config::AppConfig;
use crate::storage::Database;
use crate::summary::DailySummaryCache;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub summaries: DailySummaryCache,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, ai_backend: Arc<dyn AiBackend>, config: Arc<AppConfig>) -> Self {
        let summaries = DailySummaryCache::new(
            db.clone(),
            ai_backend,
            config.stats.inactivity_policy(),
            config.stats.summary_recent_matches,
        );
        Self {
            db,
            summaries,
            config,
        }
    }

    pub fn policy(&self) -> InactivityPolicy {
        self.config.stats.inactivity_policy()
    }

    /// Current UTC calendar day.
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
