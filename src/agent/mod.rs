// src/agent/mod.rs

//! # Agent Module
//!
//! Turns a natural-language question into an answer by running a chat model
//! in a bounded tool-calling loop over the WormholeScan tools.
//!
//! - [`Agent`] is the seam the HTTP route depends on.
//! - [`ChatModel`] is the seam between the loop and the LLM provider.

pub mod error;
pub mod llm;
pub mod prompt;
pub mod scan_agent;
pub mod tools;
pub mod types;

use async_trait::async_trait;

pub use error::AgentError;
pub use llm::OpenAiClient;
pub use scan_agent::ScanAgent;
pub use tools::{ToolBox, ToolError};
pub use types::{ChatMessage, ChatResponse, Role, ToolCall, ToolDefinition, Usage};

/// Answers one query with text.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn run(&self, query: &str) -> Result<String, AgentError>;
}

/// One chat-completion round trip.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse, AgentError>;
}
