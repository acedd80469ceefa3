// src/blockchain/services/mod.rs

pub mod activity;
pub mod observations;
pub mod swagger;
pub mod transactions;
