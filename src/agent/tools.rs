// src/agent/tools.rs

//! The WormholeScan calls the agent may make, with their JSON-Schema descriptions.
//!
//! Upstream failures are not tool errors: they come back as ordinary data
//! (`{"error": ..., "status_code": ...}`) for the model to narrate. Only
//! unknown tools and unusable arguments are reported as [`ToolError`].

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::{
    agent::types::ToolDefinition,
    blockchain::{
        chains::{ChainId, ChainRegistry},
        client::WormholeScanClient,
        models::{
            ApiError, CrossChainActivityQuery, LastTransactionsQuery, ObservationQuery,
        },
        services::{activity, observations, transactions},
    },
};

pub const GET_OBSERVATIONS_BY_TX: &str = "get_observations_by_tx";
pub const GET_CROSS_CHAIN_ACTIVITY: &str = "get_cross_chain_activity";
pub const GET_LAST_WORMHOLE_TRANSACTIONS: &str = "get_last_wormhole_transactions";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Dispatches tool calls by name onto the WormholeScan services.
#[derive(Clone, Debug)]
pub struct ToolBox {
    client: WormholeScanClient,
    registry: Arc<ChainRegistry>,
}

impl ToolBox {
    pub fn new(client: WormholeScanClient, registry: Arc<ChainRegistry>) -> Self {
        Self { client, registry }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: GET_OBSERVATIONS_BY_TX.to_string(),
                description: "Fetch guardian observations from WormholeScan for a specific transaction hash. \
                    Signatures are shortened and timestamps are UTC."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "txHash": {"type": "string", "description": "Transaction hash to filter by"},
                        "page": {"type": "integer", "minimum": 1, "description": "Page number (default 1)"},
                        "pageSize": {"type": "integer", "minimum": 1, "description": "Results per page (default 10)"},
                        "sortOrder": {"type": "string", "enum": ["ASC", "DESC"], "description": "Sort order (default DESC)"}
                    },
                    "required": ["txHash"]
                }),
            },
            ToolDefinition {
                name: GET_CROSS_CHAIN_ACTIVITY.to_string(),
                description: "Query WormholeScan for top cross-chain activity (transaction counts and volume) \
                    over a time range, optionally for one app or chain pair. Chain ids in the result are numeric."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "timespan": {"type": "string", "description": "Bucket size such as \"1h\", \"1d\", \"1mo\" (default \"1d\")"},
                        "from_time": {"type": "string", "description": "Range start, ISO-8601 UTC, e.g. 2025-04-11T15:04:05Z (default: 24h before to_time)"},
                        "to_time": {"type": "string", "description": "Range end, ISO-8601 UTC (default: now)"},
                        "appId": {"type": "string", "description": "Application id to filter by"},
                        "sourceChain": {"type": ["string", "integer"], "description": "Source chain name or Wormhole chain id"},
                        "targetChain": {"type": ["string", "integer"], "description": "Target chain name or Wormhole chain id"}
                    }
                }),
            },
            ToolDefinition {
                name: GET_LAST_WORMHOLE_TRANSACTIONS.to_string(),
                description: "Fetch the latest Wormhole transactions from WormholeScan.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "timespan": {"type": "string", "description": "Time window to sample from, e.g. \"1h\", \"1d\""},
                        "sampleRate": {"type": "integer", "minimum": 1, "description": "Sampling rate, e.g. 1 for every bucket"}
                    }
                }),
            },
        ]
    }

    /// Runs the named tool. `args` may be `null` for tools without required arguments.
    pub async fn call(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let args = if args.is_null() { json!({}) } else { args };
        debug!(tool = name, %args, "Dispatching tool call");

        match name {
            GET_OBSERVATIONS_BY_TX => {
                let query: ObservationQuery = parse_args(args)?;
                Ok(into_value(
                    observations::fetch_observations(&self.client, &query).await,
                ))
            }
            GET_CROSS_CHAIN_ACTIVITY => {
                let args: CrossChainActivityArgs = parse_args(args)?;
                let query = args.into_query(&self.registry, Utc::now())?;
                Ok(into_value(
                    activity::fetch_cross_chain_activity(&self.client, query).await,
                ))
            }
            GET_LAST_WORMHOLE_TRANSACTIONS => {
                let query: LastTransactionsQuery = parse_args(args)?;
                Ok(into_value(
                    transactions::fetch_last_transactions(&self.client, query).await,
                ))
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

fn into_value<T: Serialize>(result: Result<T, ApiError>) -> Value {
    match result.and_then(|v| {
        serde_json::to_value(v).map_err(|e| ApiError::new(e.to_string(), None))
    }) {
        Ok(value) => value,
        Err(e) => e.to_value(),
    }
}

// --- Cross-chain activity arguments ---

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChainSelector {
    Id(ChainId),
    Name(String),
}

#[derive(Debug, Deserialize)]
struct CrossChainActivityArgs {
    #[serde(default = "default_timespan")]
    timespan: String,
    #[serde(default, alias = "from")]
    from_time: Option<String>,
    #[serde(default, alias = "to")]
    to_time: Option<String>,
    #[serde(default, rename = "appId", alias = "app_id")]
    app_id: Option<String>,
    #[serde(default, rename = "sourceChain", alias = "source_chain")]
    source_chain: Option<ChainSelector>,
    #[serde(default, rename = "targetChain", alias = "target_chain")]
    target_chain: Option<ChainSelector>,
}

fn default_timespan() -> String {
    CrossChainActivityQuery::DEFAULT_TIMESPAN.to_string()
}

impl CrossChainActivityArgs {
    fn into_query(
        self,
        registry: &ChainRegistry,
        now: DateTime<Utc>,
    ) -> Result<CrossChainActivityQuery, ToolError> {
        let to = self
            .to_time
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Secs, true));
        let from = self
            .from_time
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| {
                let end = DateTime::parse_from_rfc3339(&to)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or(now);
                (end - Duration::hours(24)).to_rfc3339_opts(SecondsFormat::Secs, true)
            });

        Ok(CrossChainActivityQuery {
            timespan: self.timespan,
            from,
            to,
            app_id: self.app_id,
            source_chain: resolve_chain(registry, self.source_chain)?,
            target_chain: resolve_chain(registry, self.target_chain)?,
        })
    }
}

fn resolve_chain(
    registry: &ChainRegistry,
    selector: Option<ChainSelector>,
) -> Result<Option<ChainId>, ToolError> {
    match selector {
        None => Ok(None),
        Some(ChainSelector::Id(id)) if registry.contains_id(id) => Ok(Some(id)),
        Some(ChainSelector::Id(id)) => Err(ToolError::InvalidArguments(format!(
            "unknown chain id {}",
            id
        ))),
        Some(ChainSelector::Name(name)) if name.trim().is_empty() => Ok(None),
        Some(ChainSelector::Name(name)) => registry
            .resolve(&name)
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArguments(format!("unknown chain '{}'", name))),
    }
}
