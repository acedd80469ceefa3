// src/blockchain/mod.rs

// WormholeScan REST client and the chain registry used to render its payloads
pub mod chains;
pub mod client;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use chains::{ChainId, ChainRegistry};
pub use client::WormholeScanClient;
pub use models::ApiError;
