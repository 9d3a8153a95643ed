//! In-memory store implementations
//!
//! Used by the test suites and by `ingest --dry-run`, where nothing may
//! touch the real database. Semantics match the PostgreSQL implementations,
//! including first-writer-wins on mapping insertion.

use super::traits::{AuditStore, MappingStore, SignalStore};
use crate::domain::{AuditEvent, PseudonymMapping, Result, Signal, TenantId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory mapping store
#[derive(Default)]
pub struct MemoryMappingStore {
    rows: Mutex<HashMap<(String, String), PseudonymMapping>>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rows across all tenants
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }
}

#[async_trait]
impl MappingStore for MemoryMappingStore {
    async fn find(
        &self,
        tenant: &TenantId,
        original_hash: &str,
    ) -> Result<Option<PseudonymMapping>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .get(&(tenant.as_str().to_string(), original_hash.to_string()))
            .cloned())
    }

    async fn insert_if_absent(&self, mapping: &PseudonymMapping) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        let key = (
            mapping.tenant_id.as_str().to_string(),
            mapping.original_hash.clone(),
        );
        if rows.contains_key(&key) {
            return Ok(false);
        }
        rows.insert(key, mapping.clone());
        Ok(true)
    }

    async fn delete(&self, tenant: &TenantId, original_hash: &str) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        Ok(rows
            .remove(&(tenant.as_str().to_string(), original_hash.to_string()))
            .is_some())
    }

    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64> {
        let rows = self.rows.lock().await;
        Ok(rows.keys().filter(|(t, _)| t == tenant.as_str()).count() as u64)
    }
}

/// In-memory signal store
#[derive(Default)]
pub struct MemorySignalStore {
    rows: Mutex<Vec<Signal>>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored signals (test inspection)
    pub async fn all(&self) -> Vec<Signal> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl SignalStore for MemorySignalStore {
    async fn insert(&self, signal: &Signal) -> Result<()> {
        self.rows.lock().await.push(signal.clone());
        Ok(())
    }

    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|s| s.tenant_id == *tenant).count() as u64)
    }
}

/// In-memory audit store
#[derive(Default)]
pub struct MemoryAuditStore {
    rows: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored events in append order (test inspection)
    pub async fn all(&self) -> Vec<AuditEvent> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, event: &AuditEvent) -> Result<()> {
        self.rows.lock().await.push(event.clone());
        Ok(())
    }

    async fn recent(&self, tenant: &TenantId, limit: usize) -> Result<Vec<AuditEvent>> {
        let rows = self.rows.lock().await;
        let mut events: Vec<AuditEvent> = rows
            .iter()
            .filter(|e| e.tenant_id == *tenant)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(limit);
        Ok(events)
    }

    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|e| e.tenant_id == *tenant).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditAction, PiiKind};
    use chrono::{Duration, Utc};

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name).unwrap()
    }

    fn mapping(tenant_name: &str, hash: &str) -> PseudonymMapping {
        PseudonymMapping {
            tenant_id: tenant(tenant_name),
            original_hash: hash.to_string(),
            pseudonym: "alpine-marmot".to_string(),
            pii_kind: PiiKind::Email,
            encrypted_original: "AAAA".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_mapping_insert_if_absent_conflicts() {
        let store = MemoryMappingStore::new();
        assert!(store.insert_if_absent(&mapping("t1", "h1")).await.unwrap());
        assert!(!store.insert_if_absent(&mapping("t1", "h1")).await.unwrap());
        assert!(store.insert_if_absent(&mapping("t2", "h1")).await.unwrap());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_audit_recent_is_descending() {
        let store = MemoryAuditStore::new();
        let t = tenant("t1");
        let base = Utc::now();

        for i in 0..3 {
            store
                .append(&AuditEvent {
                    tenant_id: t.clone(),
                    signal_id: None,
                    action: AuditAction::Ingest,
                    actor: "system".to_string(),
                    details: Some(serde_json::json!({ "seq": i })),
                    timestamp: base + Duration::seconds(i),
                })
                .await
                .unwrap();
        }

        let recent = store.recent(&t, 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].timestamp > recent[1].timestamp);
    }

    #[tokio::test]
    async fn test_counts_are_tenant_scoped() {
        let store = MemoryMappingStore::new();
        store.insert_if_absent(&mapping("t1", "h1")).await.unwrap();
        store.insert_if_absent(&mapping("t1", "h2")).await.unwrap();
        store.insert_if_absent(&mapping("t2", "h1")).await.unwrap();

        assert_eq!(store.count_for_tenant(&tenant("t1")).await.unwrap(), 2);
        assert_eq!(store.count_for_tenant(&tenant("t2")).await.unwrap(), 1);
    }
}
