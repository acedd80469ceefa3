// src/lib.rs

use std::sync::Arc;
use std::time::Duration;

// Re-export modules
pub mod agent;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Answers `/query` requests
    pub agent: Arc<dyn agent::Agent>,
    /// WormholeScan tools, also served directly in JSON-RPC mode
    pub tools: agent::ToolBox,
    /// Deadline for one `/query` answer, tool rounds included
    pub request_timeout: Duration,
}
