//! Durable store abstraction traits
//!
//! The core owns three persistent record types; each gets its own narrow
//! trait so components depend only on the operations they use. All methods
//! return `Database` errors; the owning component wraps them into its own
//! failure class (`Vault`, `Persistence`, `AuditWrite`).

use crate::domain::{AuditEvent, PseudonymMapping, Result, Signal, TenantId};
use async_trait::async_trait;

/// Store for pseudonym mappings, keyed by `(tenant_id, original_hash)`
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Look up a mapping by content address
    async fn find(
        &self,
        tenant: &TenantId,
        original_hash: &str,
    ) -> Result<Option<PseudonymMapping>>;

    /// Insert a mapping unless the key already exists
    ///
    /// Returns `true` if the row was inserted, `false` on key conflict.
    /// A conflict is not an error: first-writer-wins, and the caller
    /// re-reads the authoritative row.
    async fn insert_if_absent(&self, mapping: &PseudonymMapping) -> Result<bool>;

    /// Delete a mapping; returns whether a row existed
    async fn delete(&self, tenant: &TenantId, original_hash: &str) -> Result<bool>;

    /// Number of mappings held for a tenant
    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64>;
}

/// Store for persisted signal records
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Insert a new signal record
    async fn insert(&self, signal: &Signal) -> Result<()>;

    /// Number of signals held for a tenant
    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64>;
}

/// Append-only store for audit events
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one event; rows are never updated or deleted
    async fn append(&self, event: &AuditEvent) -> Result<()>;

    /// Most recent events for a tenant, timestamp-descending
    async fn recent(&self, tenant: &TenantId, limit: usize) -> Result<Vec<AuditEvent>>;

    /// Number of audit entries held for a tenant
    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64>;
}
