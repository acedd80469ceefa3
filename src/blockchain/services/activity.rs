// src/blockchain/services/activity.rs

use serde_json::Value;
use tracing::info;

use crate::blockchain::{
    client::WormholeScanClient,
    models::{ApiError, CrossChainActivityQuery},
};

/// Top cross-chain activity for a time range. The upstream body is returned as is.
pub async fn fetch_cross_chain_activity(
    client: &WormholeScanClient,
    query: CrossChainActivityQuery,
) -> Result<Value, ApiError> {
    let query = query.normalized();
    info!(
        timespan = %query.timespan,
        from = %query.from,
        to = %query.to,
        app_id = ?query.app_id,
        source_chain = ?query.source_chain,
        target_chain = ?query.target_chain,
        "Fetching cross-chain activity"
    );

    client
        .get(&client.endpoint("x-chain-activity/tops"), &query)
        .await
}
