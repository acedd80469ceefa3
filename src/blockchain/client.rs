//! HTTP client for the WormholeScan REST API.
//!
//! Every call goes through [`WormholeScanClient::get`], which turns transport
//! failures, non-2xx statuses and malformed bodies into [`ApiError`] values.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::blockchain::models::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.wormholescan.io";

/// Thin wrapper over a shared `reqwest::Client` bound to one WormholeScan deployment.
#[derive(Clone, Debug)]
pub struct WormholeScanClient {
    http: Client,
    base_url: String,
}

impl WormholeScanClient {
    /// Create a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build WormholeScan HTTP client")?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an `/api/v1` endpoint.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Builds the GET request for `url` without sending it.
    pub fn build_request<Q>(&self, url: &str, query: &Q) -> Result<reqwest::Request, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        self.http.get(url).query(query).build().map_err(ApiError::from)
    }

    /// Issues one GET and decodes the JSON body into `T`.
    pub async fn get<T, Q>(&self, url: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.build_request(url, query)?;
        debug!(url = %request.url(), "GET WormholeScan");

        let response = self.http.execute(request).await.map_err(|e| {
            warn!(url, error = %e, "WormholeScan request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let response = response.error_for_status().map_err(|e| {
            warn!(url, status = %status, "WormholeScan returned an error status");
            ApiError::from(e)
        })?;

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::new(e.to_string(), Some(status.as_u16())))?;

        serde_json::from_str::<T>(&body).map_err(|e| {
            warn!(url, error = %e, "WormholeScan returned a malformed body");
            ApiError::new(
                format!("Malformed response from {}: {}", url, e),
                Some(status.as_u16()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::models::{LastTransactionsQuery, ObservationQuery};
    use std::num::NonZeroU32;

    fn client() -> WormholeScanClient {
        WormholeScanClient::new("https://api.wormholescan.io/", Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = client();
        assert_eq!(client.base_url(), "https://api.wormholescan.io");
        assert_eq!(
            client.endpoint("observations"),
            "https://api.wormholescan.io/api/v1/observations"
        );
        assert_eq!(
            client.endpoint("/last-txs"),
            "https://api.wormholescan.io/api/v1/last-txs"
        );
    }

    #[test]
    fn test_observation_query_string() {
        let client = client();
        let request = client
            .build_request(&client.endpoint("observations"), &ObservationQuery::for_tx("0xabc"))
            .unwrap();
        assert_eq!(
            request.url().query(),
            Some("page=1&pageSize=10&txHash=0xabc&sortOrder=DESC")
        );
    }

    #[test]
    fn test_absent_params_are_not_sent() {
        let client = client();
        let request = client
            .build_request(&client.endpoint("last-txs"), &LastTransactionsQuery::default())
            .unwrap();
        assert_eq!(request.url().query(), None);

        let query = LastTransactionsQuery {
            timespan: Some("1h".into()),
            sample_rate: NonZeroU32::new(10),
        };
        let request = client
            .build_request(&client.endpoint("last-txs"), &query)
            .unwrap();
        assert_eq!(request.url().query(), Some("timespan=1h&sampleRate=10"));
    }
}
