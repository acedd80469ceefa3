// src/blockchain/services/transactions.rs

use tracing::info;

use crate::blockchain::{
    client::WormholeScanClient,
    models::{ApiError, LastTransactionsQuery, TransactionSamples, TransactionsPayload},
};

/// Latest Wormhole transactions, always unwrapped to a flat list when the
/// upstream answers with either a bare array or a `{"data": [...]}` envelope.
pub async fn fetch_last_transactions(
    client: &WormholeScanClient,
    query: LastTransactionsQuery,
) -> Result<TransactionSamples, ApiError> {
    let query = query.normalized();
    info!(
        timespan = ?query.timespan,
        sample_rate = ?query.sample_rate,
        "Fetching last transactions"
    );

    let payload: TransactionsPayload = client.get(&client.endpoint("last-txs"), &query).await?;
    Ok(payload.normalize())
}
