//! # API Module
//!
//! HTTP surface of the server.
//!
//! ## Available Endpoints
//!
//! - `POST /query` - Ask the WormholeScan agent a question: `{"query": "..."}` -> `{"response": "..."}`
//! - `GET /health` - Liveness probe

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod health;
pub mod query;

/// The application router with tracing and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/query", post(query::query_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
