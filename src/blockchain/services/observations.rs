// src/blockchain/services/observations.rs

use tracing::info;

use crate::blockchain::{
    client::WormholeScanClient,
    models::{ApiError, ObservationQuery, ObservationRecord, ObservationsPage},
};

/// Fetches the guardian observations of a transaction and cleans them up for display.
pub async fn fetch_observations(
    client: &WormholeScanClient,
    query: &ObservationQuery,
) -> Result<Vec<ObservationRecord>, ApiError> {
    info!(
        tx_hash = %query.tx_hash,
        page = query.page.get(),
        page_size = query.page_size.get(),
        sort_order = %query.sort_order,
        "Fetching observations"
    );

    let page: ObservationsPage = client.get(&client.endpoint("observations"), query).await?;

    Ok(page
        .observations
        .into_iter()
        .map(ObservationRecord::from)
        .collect())
}
