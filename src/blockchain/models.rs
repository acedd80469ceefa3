// src/blockchain/models.rs
use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::blockchain::chains::ChainId;

// --- Error type for upstream calls ---

/// Uniform failure value returned by every WormholeScan call.
///
/// `status_code` is only set when an HTTP response was actually received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status_code: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    /// The shape handed to the agent: `{"error": ..., "status_code": ...}`.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "error": self.message,
            "status_code": self.status_code,
        })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            message: e.to_string(),
            status_code: e.status().map(|s| s.as_u16()),
        }
    }
}

// --- Observation models ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[default]
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("ASC"),
            SortOrder::Desc => f.write_str("DESC"),
        }
    }
}

/// Parameters of `GET /api/v1/observations`. Serializes to the upstream query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationQuery {
    #[serde(default = "default_page")]
    pub page: NonZeroU32,
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroU32,
    pub tx_hash: String,
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_page() -> NonZeroU32 {
    NonZeroU32::MIN
}

fn default_page_size() -> NonZeroU32 {
    NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN)
}

impl ObservationQuery {
    /// Query for the first page of observations of a transaction, newest first.
    pub fn for_tx(tx_hash: impl Into<String>) -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            tx_hash: tx_hash.into(),
            sort_order: SortOrder::default(),
        }
    }
}

/// One observation as returned by WormholeScan, before cleanup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    #[serde(default, deserialize_with = "de_lenient_chain_id")]
    pub emitter_chain: Option<ChainId>,
    #[serde(default)]
    pub emitter_addr: Option<String>,
    #[serde(default)]
    pub emitter_address: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_u64")]
    pub sequence: Option<u64>,
    #[serde(default)]
    pub guardian_addr: Option<String>,
    #[serde(default)]
    pub guardian_address: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ObservationsPage {
    pub observations: Vec<RawObservation>,
}

/// A cleaned observation, safe to hand to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationRecord {
    #[serde(rename = "Emitter Chain")]
    pub emitter_chain: Option<ChainId>,
    #[serde(rename = "Emitter Address")]
    pub emitter_address: Option<String>,
    #[serde(rename = "Sequence")]
    pub sequence: Option<u64>,
    #[serde(rename = "Guardian Address")]
    pub guardian_address: Option<String>,
    #[serde(rename = "Tx Hash")]
    pub tx_hash: Option<String>,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    /// First 10 characters followed by `...`.
    #[serde(rename = "Signature")]
    pub signature: Option<String>,
}

pub const SIGNATURE_PREVIEW_CHARS: usize = 10;

impl From<RawObservation> for ObservationRecord {
    fn from(raw: RawObservation) -> Self {
        Self {
            emitter_chain: raw.emitter_chain,
            emitter_address: raw.emitter_address.or(raw.emitter_addr),
            sequence: raw.sequence,
            guardian_address: raw.guardian_address.or(raw.guardian_addr),
            tx_hash: raw.tx_hash,
            timestamp: raw.timestamp.as_ref().and_then(format_timestamp),
            signature: raw.signature.as_deref().and_then(truncate_signature),
        }
    }
}

/// Shortens a signature for display. Empty signatures count as absent.
pub fn truncate_signature(signature: &str) -> Option<String> {
    if signature.is_empty() {
        return None;
    }
    let preview: String = signature.chars().take(SIGNATURE_PREVIEW_CHARS).collect();
    Some(format!("{preview}..."))
}

/// Formats an upstream timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// Accepts epoch seconds (number or numeric string) and RFC 3339 strings.
pub fn format_timestamp(value: &Value) -> Option<String> {
    let datetime = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(secs) => DateTime::<Utc>::from_timestamp(secs, 0),
                Err(_) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            }
        }
        _ => None,
    }?;
    Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn de_lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// Out-of-range or non-numeric chain ids become `None` rather than failing the page.
fn de_lenient_chain_id<'de, D>(deserializer: D) -> Result<Option<ChainId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_lenient_u64(deserializer)?.and_then(|id| ChainId::try_from(id).ok()))
}

// --- Cross-chain activity models ---

/// Parameters of `GET /api/v1/x-chain-activity/tops`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainActivityQuery {
    pub timespan: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_chain: Option<ChainId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_chain: Option<ChainId>,
}

impl CrossChainActivityQuery {
    pub const DEFAULT_TIMESPAN: &'static str = "1d";

    /// Drops an empty `appId` so it is not sent upstream.
    pub fn normalized(mut self) -> Self {
        self.app_id = self.app_id.filter(|id| !id.trim().is_empty());
        self
    }
}

// --- Last transactions models ---

/// A transaction record from `GET /api/v1/last-txs`. Its shape belongs to the upstream.
pub type TransactionSample = Value;

/// Parameters of `GET /api/v1/last-txs`. Absent values are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastTransactionsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timespan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<NonZeroU32>,
}

impl LastTransactionsQuery {
    pub fn normalized(mut self) -> Self {
        self.timespan = self.timespan.filter(|t| !t.trim().is_empty());
        self
    }
}

/// The shapes `last-txs` is known to answer with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TransactionsPayload {
    List(Vec<TransactionSample>),
    Envelope { data: Vec<TransactionSample> },
    Other(Value),
}

/// `last-txs` result after unwrapping the envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionSamples {
    Samples(Vec<TransactionSample>),
    Unrecognized(Value),
}

impl TransactionsPayload {
    pub fn normalize(self) -> TransactionSamples {
        match self {
            TransactionsPayload::List(samples) | TransactionsPayload::Envelope { data: samples } => {
                TransactionSamples::Samples(samples)
            }
            TransactionsPayload::Other(value) => TransactionSamples::Unrecognized(value),
        }
    }
}

impl TransactionSamples {
    pub fn samples(&self) -> Option<&[TransactionSample]> {
        match self {
            TransactionSamples::Samples(samples) => Some(samples),
            TransactionSamples::Unrecognized(_) => None,
        }
    }
}
