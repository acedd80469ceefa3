// src/blockchain/services/swagger.rs

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::blockchain::{client::WormholeScanClient, models::ApiError};

/// What we log about the published API description at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSummary {
    pub title: Option<String>,
    pub version: Option<String>,
    pub path_count: usize,
}

#[derive(Debug, Deserialize)]
struct SwaggerDocument {
    #[serde(default)]
    info: Option<SwaggerInfo>,
    #[serde(default)]
    paths: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct SwaggerInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// Fetches `/swagger.json`. Informational only; nothing downstream depends on it.
pub async fn fetch_api_summary(client: &WormholeScanClient) -> Result<ApiSummary, ApiError> {
    let url = format!("{}/swagger.json", client.base_url());
    let doc: SwaggerDocument = client.get(&url, &[] as &[(&str, &str)]).await?;
    let (title, version) = doc
        .info
        .map(|info| (info.title, info.version))
        .unwrap_or_default();
    Ok(ApiSummary {
        title,
        version,
        path_count: doc.paths.len(),
    })
}
