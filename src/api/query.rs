// src/api/query.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{agent::AgentError, AppState};

// --- Request and Response Models ---

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
}

/// Everything `POST /query` can fail with, and the status each maps to.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Missing 'query' in request body")]
    MissingQuery,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Agent(#[from] AgentError),

    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::MissingQuery | QueryError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            QueryError::Agent(_) | QueryError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

// --- Handler ---

/// Handler for the POST /query endpoint.
pub async fn query_handler(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, QueryError> {
    let request_id = Uuid::new_v4();

    let Json(payload) = payload.map_err(|rejection| {
        warn!(%request_id, error = %rejection.body_text(), "Rejected /query body");
        QueryError::InvalidBody(rejection.body_text())
    })?;

    let query = match payload.query {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            warn!(%request_id, "Rejected /query without a query");
            return Err(QueryError::MissingQuery);
        }
    };

    info!(%request_id, query_len = query.len(), "Received query");

    match tokio::time::timeout(state.request_timeout, state.agent.run(&query)).await {
        Ok(Ok(response)) => {
            info!(%request_id, response_len = response.len(), "Query answered");
            Ok(Json(QueryResponse { response }))
        }
        Ok(Err(e)) => {
            error!(%request_id, error = %e, "Agent failed to answer query");
            Err(QueryError::Agent(e))
        }
        Err(_) => {
            error!(%request_id, timeout = ?state.request_timeout, "Query timed out");
            Err(QueryError::Timeout(state.request_timeout))
        }
    }
}
