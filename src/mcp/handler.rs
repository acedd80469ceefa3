//! # JSON-RPC Handler Module
//!
//! Serves the WormholeScan tools over a Model Context Protocol style
//! JSON-RPC interface, so other agents can call them without going through
//! `/query`.
//!
//! ## Supported Methods
//!
//! - `initialize` - Server info and capabilities
//! - `tools/list` - The tool definitions the in-process agent also sees
//! - `tools/call` - Run one tool: `{"name": "...", "arguments": {...}}`
//!
//! Tool names may also be used directly as the method name.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    agent::tools::{
        ToolError, GET_CROSS_CHAIN_ACTIVITY, GET_LAST_WORMHOLE_TRANSACTIONS,
        GET_OBSERVATIONS_BY_TX,
    },
    mcp::protocol::{error_codes, Request, Response, JSONRPC_VERSION},
    utils, AppState,
};

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(payload: Value) -> Value {
    let is_error = payload.get("error").is_some();
    json!({
        "content": [{ "type": "text", "text": payload.to_string() }],
        "structuredContent": payload,
        "isError": is_error,
    })
}

/// This is the main dispatcher for all incoming JSON-RPC requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling JSON-RPC request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    if req.jsonrpc != JSONRPC_VERSION {
        return Some(Response::error(
            req.id,
            error_codes::INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", req.jsonrpc),
        ));
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req, &state),
        "tools/call" => handle_tool_call(req, &state).await,
        // Direct method calls are rewritten into tools/call
        GET_OBSERVATIONS_BY_TX | GET_CROSS_CHAIN_ACTIVITY | GET_LAST_WORMHOLE_TRANSACTIONS => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": req.method.clone(),
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, &state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the tool box.
async fn handle_tool_call(req: Request, state: &AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name: String = match utils::get_required_arg(params, "name", &req.id) {
        Ok(name) => name,
        Err(resp) => return resp,
    };
    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    match state.tools.call(&tool_name, args).await {
        Ok(payload) => Response::success(req.id, make_texty_result(payload)),
        Err(e) => {
            if matches!(e, ToolError::UnknownTool(_)) {
                warn!(tool = %tool_name, "Unknown tool requested");
            }
            Response::tool_error(req.id, &tool_name, &e)
        }
    }
}

fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "wormholescan_agent",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "WormholeScan tools: guardian observations by transaction, top cross-chain activity, and the latest Wormhole transactions.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning the JSON definition of all available tools.
fn handle_tools_list(req: &Request, state: &AppState) -> Response {
    let tools: Vec<Value> = state
        .tools
        .definitions()
        .into_iter()
        .map(|def| {
            json!({
                "name": def.name,
                "description": def.description,
                "inputSchema": def.parameters,
            })
        })
        .collect();

    Response::success(req.id.clone(), json!({ "tools": tools }))
}
