// src/mcp/protocol.rs

//! JSON-RPC 2.0 envelopes for the stdio tool server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::ToolError;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

impl Request {
    /// Requests without an id are notifications and get no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

/// A reply carries exactly one of `result` or `error`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    fn new(id: Value, outcome: Outcome) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome,
        }
    }

    pub fn success(id: Value, result: Value) -> Self {
        Self::new(id, Outcome::Result(result))
    }

    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self::new(id, Outcome::Error(ErrorObject::new(code, message)))
    }

    /// Rejection of a `tools/call`; `data.tool` names the tool that was asked for.
    pub fn tool_error(id: Value, tool: &str, error: &ToolError) -> Self {
        let error = ErrorObject::new(error_codes::INVALID_PARAMS, error.to_string())
            .with_data(serde_json::json!({ "tool": tool }));
        Self::new(id, Outcome::Error(error))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_has_no_error_member() {
        let value = serde_json::to_value(Response::success(json!(1), json!({"ok": true}))).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 1, "result": {"ok": true}}));
    }

    #[test]
    fn test_tool_error_shape() {
        let response = Response::tool_error(
            json!("a"),
            "get_balance",
            &ToolError::UnknownTool("get_balance".into()),
        );
        assert!(response.is_error());

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], error_codes::INVALID_PARAMS);
        assert_eq!(value["error"]["message"], "unknown tool: get_balance");
        assert_eq!(value["error"]["data"], json!({"tool": "get_balance"}));
    }

    #[test]
    fn test_request_defaults() {
        let req: Request = serde_json::from_value(json!({"method": "tools/list"})).unwrap();
        assert_eq!(req.jsonrpc, JSONRPC_VERSION);
        assert!(req.is_notification());
        assert!(req.params.is_none());
    }
}
