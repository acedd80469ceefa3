// src/agent/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("llm http error: {0}")]
    Http(String),

    #[error("unexpected llm response format: {0}")]
    ResponseFormat(String),

    #[error("agent stopped after {0} tool rounds without a final answer")]
    ToolLoopLimit(usize),
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        Self::ResponseFormat(e.to_string())
    }
}
