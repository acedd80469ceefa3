//! Tests for the tool-calling agent loop

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockito::{Matcher, Server};
use secrecy::SecretString;
use serde_json::{json, Value};

use wormholescan_agent::{
    agent::{
        tools::GET_LAST_WORMHOLE_TRANSACTIONS, Agent, AgentError, ChatMessage, ChatModel,
        ChatResponse, OpenAiClient, Role, ScanAgent, ToolBox, ToolCall, ToolDefinition, Usage,
    },
    blockchain::{ChainRegistry, WormholeScanClient},
};

/// Replays canned responses and keeps every conversation it was shown.
#[derive(Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<ChatResponse>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    fn new(replies: Vec<ChatResponse>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::default(),
        }
    }

    fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ChatResponse, AgentError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::ResponseFormat("script exhausted".into()))
    }
}

fn answer(text: &str) -> ChatResponse {
    ChatResponse {
        message: ChatMessage::assistant(text),
        usage: Usage::default(),
        finish_reason: "stop".into(),
    }
}

fn tool_request(id: &str, name: &str, arguments: &str) -> ChatResponse {
    let mut message = ChatMessage::assistant("");
    message.tool_calls.push(ToolCall {
        id: id.into(),
        name: name.into(),
        arguments: arguments.into(),
    });
    ChatResponse {
        message,
        usage: Usage::default(),
        finish_reason: "tool_calls".into(),
    }
}

fn tools_for(base_url: &str) -> ToolBox {
    let client = WormholeScanClient::new(base_url, Duration::from_secs(5)).unwrap();
    ToolBox::new(client, Arc::new(ChainRegistry::wormhole().unwrap()))
}

#[tokio::test]
async fn test_agent_answers_without_tools() {
    let model = Arc::new(ScriptedModel::new(vec![answer("Wormhole connects 30+ chains.")]));
    let agent = ScanAgent::new(model.clone(), tools_for("http://localhost"), 5);

    let reply = agent.run("what is wormhole?").await.unwrap();

    assert_eq!(reply, "Wormhole connects 30+ chains.");
    let conversations = model.conversations();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0][0].role, Role::System);
    assert!(conversations[0][0].content.contains("Ethereum = 2"));
    assert_eq!(conversations[0][1], ChatMessage::user("what is wormhole?"));
}

#[tokio::test]
async fn test_agent_feeds_tool_output_back_to_model() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/last-txs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("timespan".into(), "1d".into()),
            Matcher::UrlEncoded("sampleRate".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "data": [{ "count": 7 }] }).to_string())
        .create_async()
        .await;

    let model = Arc::new(ScriptedModel::new(vec![
        tool_request(
            "call_1",
            GET_LAST_WORMHOLE_TRANSACTIONS,
            r#"{"timespan": "1d", "sampleRate": 1}"#,
        ),
        answer("7 transactions in the last day."),
    ]));
    let agent = ScanAgent::new(model.clone(), tools_for(&server.url()), 5);

    let reply = agent.run("how busy was wormhole today?").await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply, "7 transactions in the last day.");

    let conversations = model.conversations();
    assert_eq!(conversations.len(), 2);
    let second = &conversations[1];
    assert_eq!(second.len(), 4);
    assert_eq!(second[2].role, Role::Assistant);
    assert_eq!(second[2].tool_calls[0].id, "call_1");
    assert_eq!(second[3].role, Role::Tool);
    assert_eq!(second[3].tool_call_id.as_deref(), Some("call_1"));
    let output: Value = serde_json::from_str(&second[3].content).unwrap();
    assert_eq!(output, json!([{ "count": 7 }]));
}

#[tokio::test]
async fn test_upstream_failure_is_reported_to_model() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/last-txs")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", GET_LAST_WORMHOLE_TRANSACTIONS, "{}"),
        answer("WormholeScan is unavailable right now."),
    ]));
    let agent = ScanAgent::new(model.clone(), tools_for(&server.url()), 5);

    let reply = agent.run("latest transactions?").await.unwrap();
    assert_eq!(reply, "WormholeScan is unavailable right now.");

    let conversations = model.conversations();
    let output: Value = serde_json::from_str(&conversations[1][3].content).unwrap();
    assert_eq!(output["status_code"], 503);
    assert!(output["error"].is_string());
}

#[tokio::test]
async fn test_bad_tool_calls_become_error_results() {
    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", "get_balance", "{}"),
        tool_request("call_2", GET_LAST_WORMHOLE_TRANSACTIONS, "{not json"),
        answer("Sorry, I could not look that up."),
    ]));
    let agent = ScanAgent::new(model.clone(), tools_for("http://localhost"), 5);

    let reply = agent.run("balance?").await.unwrap();
    assert_eq!(reply, "Sorry, I could not look that up.");

    let conversations = model.conversations();
    let unknown: Value = serde_json::from_str(&conversations[1][3].content).unwrap();
    assert!(unknown["error"].as_str().unwrap().contains("get_balance"));

    let invalid: Value = serde_json::from_str(&conversations[2][5].content).unwrap();
    assert!(invalid["error"].as_str().unwrap().contains("invalid tool arguments"));
}

#[tokio::test]
async fn test_agent_stops_after_round_limit() {
    let model = Arc::new(ScriptedModel::new(vec![
        tool_request("call_1", "get_balance", "{}"),
        tool_request("call_2", "get_balance", "{}"),
        tool_request("call_3", "get_balance", "{}"),
    ]));
    let agent = ScanAgent::new(model.clone(), tools_for("http://localhost"), 2);

    let err = agent.run("loop").await.unwrap_err();

    assert!(matches!(err, AgentError::ToolLoopLimit(2)));
    assert_eq!(model.conversations().len(), 2);
}

#[tokio::test]
async fn test_openai_client_round_trip() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({ "model": "gpt-4", "temperature": 0.0 })))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "Hello from the model" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 4 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OpenAiClient::new(
        SecretString::new("sk-test".to_string()),
        "gpt-4",
        &format!("{}/v1", server.url()),
        0.0,
        Duration::from_secs(5),
    )
    .unwrap();

    let response = client.chat(&[ChatMessage::user("hi")], &[]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.message.content, "Hello from the model");
    assert_eq!(response.usage.prompt_tokens, 12);
    assert_eq!(response.finish_reason, "stop");
}

#[tokio::test]
async fn test_openai_client_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "bad key"}}"#)
        .create_async()
        .await;

    let client = OpenAiClient::new(
        SecretString::new("sk-wrong".to_string()),
        "gpt-4",
        &format!("{}/v1", server.url()),
        0.0,
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client.chat(&[ChatMessage::user("hi")], &[]).await.unwrap_err();
    assert!(matches!(err, AgentError::Http(msg) if msg.contains("401")));
}
