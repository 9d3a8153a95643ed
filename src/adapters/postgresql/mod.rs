//! PostgreSQL adapter
//!
//! Pooled client plus store implementations for mappings, signals and the
//! audit log.

pub mod client;
pub mod stores;

pub use client::PostgresClient;
pub use stores::{PostgresAuditStore, PostgresMappingStore, PostgresSignalStore};
