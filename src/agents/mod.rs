//! AI-powered text generation agents.
//!
//! Agents turn league data into prose using a pluggable text-generation
//! backend. All agents implement the `Agent` trait.

pub mod backend;
pub mod summary_writer;

use async_trait::async_trait;
use thiserror::Error;

pub use backend::{create_backend, AiBackend, AiBackendConfig, ChatMessage, ChatRequest, ChatResponse};
pub use summary_writer::{SummaryWriterAgent, SummaryWriterInput};

/// Errors that can occur during agent execution.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("AI backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("AI response unparseable: {0}")]
    ResponseParseError(String),

    #[error("AI returned an empty response")]
    EmptyResponse,

    #[error("Backend misconfigured: {0}")]
    Misconfigured(String),
}

/// Core trait for all AI agents.
#[async_trait]
pub trait Agent {
    type Input;
    type Output;

    /// Agent identifier for logging.
    fn name(&self) -> &'static str;

    /// Execute the agent's task.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentError>;
}
