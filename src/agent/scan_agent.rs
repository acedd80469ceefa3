// src/agent/scan_agent.rs

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::agent::{
    error::AgentError,
    prompt::system_prompt,
    tools::ToolBox,
    types::{ChatMessage, ToolCall},
    Agent, ChatModel,
};

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// Answers questions about Wormhole traffic by letting a chat model call WormholeScan tools.
pub struct ScanAgent {
    llm: Arc<dyn ChatModel>,
    tools: ToolBox,
    system_prompt: String,
    max_tool_rounds: usize,
}

impl ScanAgent {
    pub fn new(llm: Arc<dyn ChatModel>, tools: ToolBox, max_tool_rounds: usize) -> Self {
        let system_prompt = system_prompt(tools.registry());
        Self {
            llm,
            tools,
            system_prompt,
            max_tool_rounds: max_tool_rounds.max(1),
        }
    }

    async fn execute_tool_call(&self, tool_call: &ToolCall) -> String {
        let args: Value = if tool_call.arguments.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(&tool_call.arguments) {
                Ok(v) => v,
                Err(e) => {
                    warn!(
                        tool_call_id = %tool_call.id,
                        tool_name = %tool_call.name,
                        error = %e,
                        "tool call arguments are not valid JSON"
                    );
                    return json!({ "error": format!("invalid tool arguments: {e}") }).to_string();
                }
            }
        };

        let started = Instant::now();
        match self.tools.call(&tool_call.name, args).await {
            Ok(out) => {
                let out = out.to_string();
                info!(
                    tool_call_id = %tool_call.id,
                    tool_name = %tool_call.name,
                    latency_ms = started.elapsed().as_millis() as u64,
                    output_len = out.len(),
                    "tool call executed"
                );
                out
            }
            Err(e) => {
                warn!(
                    tool_call_id = %tool_call.id,
                    tool_name = %tool_call.name,
                    error = %e,
                    "tool call rejected"
                );
                json!({ "error": e.to_string() }).to_string()
            }
        }
    }
}

#[async_trait]
impl Agent for ScanAgent {
    #[tracing::instrument(level = "info", skip_all)]
    async fn run(&self, query: &str) -> Result<String, AgentError> {
        let tool_defs = self.tools.definitions();
        let mut messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(query),
        ];

        for round in 1..=self.max_tool_rounds {
            let started = Instant::now();
            let response = self.llm.chat(&messages, &tool_defs).await?;
            info!(
                round,
                latency_ms = started.elapsed().as_millis() as u64,
                prompt_tokens = response.usage.prompt_tokens,
                completion_tokens = response.usage.completion_tokens,
                tool_calls = response.message.tool_calls.len(),
                finish_reason = %response.finish_reason,
                "llm call completed"
            );

            if response.message.tool_calls.is_empty() {
                return Ok(response.message.content);
            }

            let tool_calls = response.message.tool_calls.clone();
            messages.push(response.message);
            for tool_call in &tool_calls {
                let out = self.execute_tool_call(tool_call).await;
                messages.push(ChatMessage::tool_result(tool_call.id.as_str(), out));
            }
        }

        error!(max_tool_rounds = self.max_tool_rounds, "agent tool loop limit reached");
        Err(AgentError::ToolLoopLimit(self.max_tool_rounds))
    }
}
