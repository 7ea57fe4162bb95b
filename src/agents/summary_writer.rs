//! Summary Writer Agent.
//!
//! Writes a short daily recap of league play from recent results and the
//! current standings.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use super::backend::{AiBackend, ChatMessage, ChatRequest};
use super::{Agent, AgentError};
use crate::calculate::format_team_names;
use crate::models::{Match, PlayerId, PlayerStats, Side};

/// Input for the Summary Writer agent.
#[derive(Debug, Clone)]
pub struct SummaryWriterInput {
    /// Day the summary is written for
    pub date: NaiveDate,

    /// Most recent matches, newest first
    pub recent_matches: Vec<Match>,

    /// Current standings, best first
    pub standings: Vec<PlayerStats>,

    /// Player names by id, used to render line-ups
    pub names: HashMap<PlayerId, String>,
}

/// Summary Writer agent implementation.
pub struct SummaryWriterAgent {
    backend: Arc<dyn AiBackend>,
}

impl SummaryWriterAgent {
    pub fn new(backend: Arc<dyn AiBackend>) -> Self {
        Self { backend }
    }

    fn build_prompt(&self, input: &SummaryWriterInput) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SUMMARY_WRITER_SYSTEM_PROMPT),
            ChatMessage::user(render_league_digest(input)),
        ]
    }
}

fn lineup(m: &Match, side: Side, names: &HashMap<PlayerId, String>) -> String {
    format_team_names(m.slots(side).iter().flatten().map(|id| {
        names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", id))
    }))
}

/// Plain-text digest of results and standings handed to the model.
pub fn render_league_digest(input: &SummaryWriterInput) -> String {
    let mut out = format!("Date: {}\n\nRecent matches (newest first):\n", input.date);

    if input.recent_matches.is_empty() {
        out.push_str("- none\n");
    }
    for m in &input.recent_matches {
        out.push_str(&format!(
            "- {}: {} {} - {} {}\n",
            m.date.format("%Y-%m-%d"),
            lineup(m, Side::TeamOne, &input.names),
            m.team_one_games_won,
            m.team_two_games_won,
            lineup(m, Side::TeamTwo, &input.names),
        ));
    }

    out.push_str("\nStandings:\n");
    for (rank, s) in input
        .standings
        .iter()
        .filter(|s| s.record.matches_played() > 0)
        .enumerate()
    {
        out.push_str(&format!(
            "{}. {} - {}W {}L {}T, {}% (streak: {} {})\n",
            rank + 1,
            s.name,
            s.record.wins,
            s.record.losses,
            s.record.ties,
            s.win_percentage,
            s.streak.count,
            s.streak.kind,
        ));
    }
    out
}

const SUMMARY_WRITER_SYSTEM_PROMPT: &str = r#"You write the daily recap for a recreational volleyball league.

Using only the results and standings provided:
- Mention notable results from the recent matches
- Call out who leads the standings and any long streaks
- Keep it upbeat and friendly, two short paragraphs at most

Do NOT invent matches, scores or players that are not listed.
Respond with plain text only, no markdown headings."#;

#[async_trait]
impl Agent for SummaryWriterAgent {
    type Input = SummaryWriterInput;
    type Output = String;

    fn name(&self) -> &'static str {
        "summary_writer"
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentError> {
        info!(
            "Running Summary Writer for {} via {}",
            input.date,
            self.backend.name()
        );

        let request = ChatRequest::new(self.build_prompt(&input))
            .with_temperature(0.7)
            .with_max_tokens(400);
        let response = self.backend.chat(request).await?;
        debug!(
            "Summary from {} ({:?} tokens)",
            response.model, response.tokens_used
        );

        let text = response.content.trim();
        if text.is_empty() {
            return Err(AgentError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::backend::MockBackend;
    use crate::models::{Record, Streak, StreakType};
    use chrono::{TimeZone, Utc};

    fn input() -> SummaryWriterInput {
        let names = [(1, "Alice"), (2, "Bob"), (3, "Cy")]
            .into_iter()
            .map(|(id, n)| (id, n.to_string()))
            .collect();
        SummaryWriterInput {
            date: NaiveDate::from_ymd_opt(2025, 8, 2).unwrap(),
            recent_matches: vec![Match {
                id: 1,
                team_one_player_ids: [Some(2), Some(1), None],
                team_two_player_ids: [Some(3), None, None],
                team_one_games_won: 3,
                team_two_games_won: 1,
                date: Utc.with_ymd_and_hms(2025, 8, 1, 19, 0, 0).unwrap(),
                season_id: None,
            }],
            standings: vec![PlayerStats {
                id: 1,
                name: "Alice".to_string(),
                record: Record {
                    wins: 1,
                    games_won: 3,
                    games_lost: 1,
                    total_games: 4,
                    ..Default::default()
                },
                win_percentage: 100,
                streak: Streak {
                    kind: StreakType::Wins,
                    count: 1,
                },
                longest_streak: 1,
                last_played: None,
                actual_win_percentage: None,
                inactivity_penalty: None,
            }],
            names,
        }
    }

    #[test]
    fn test_digest_renders_lineups_and_standings() {
        let digest = render_league_digest(&input());
        assert!(digest.contains("Date: 2025-08-02"));
        assert!(digest.contains("- 2025-08-01: Alice and Bob 3 - 1 Cy"));
        assert!(digest.contains("1. Alice - 1W 0L 0T, 100% (streak: 1 wins)"));
    }

    #[test]
    fn test_digest_without_matches() {
        let mut input = input();
        input.recent_matches.clear();
        input.standings.clear();
        let digest = render_league_digest(&input);
        assert!(digest.contains("- none"));
    }

    #[tokio::test]
    async fn test_execute_returns_trimmed_text() {
        let backend = Arc::new(MockBackend::new("  Alice dominated."));
        let agent = SummaryWriterAgent::new(backend.clone());
        let text = agent.execute(input()).await.unwrap();
        assert_eq!(text, "Alice dominated. #1");
        assert_eq!(backend.calls(), 1);
    }
}
