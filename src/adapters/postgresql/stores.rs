//! PostgreSQL store implementations
//!
//! One implementation per store trait, all sharing the pooled client.
//! Mapping insertion uses `ON CONFLICT DO NOTHING` so concurrent
//! first-creation resolves through the uniqueness constraint rather than
//! an application-level lock.

use super::client::PostgresClient;
use crate::adapters::database::{AuditStore, MappingStore, SignalStore};
use crate::domain::{
    AuditAction, AuditEvent, PiiKind, PseudonymMapping, Result, Signal, SignalId, SignalveilError,
    TenantId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use tokio_postgres::Row;

/// Mapping store over the `pseudonym_mapping` table
pub struct PostgresMappingStore {
    client: Arc<PostgresClient>,
}

impl PostgresMappingStore {
    pub fn new(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }
}

fn mapping_from_row(row: &Row) -> Result<PseudonymMapping> {
    let tenant_id: String = row.get("tenant_id");
    let pii_kind: String = row.get("pii_kind");

    Ok(PseudonymMapping {
        tenant_id: TenantId::new(tenant_id).map_err(SignalveilError::Database)?,
        original_hash: row.get("original_hash"),
        pseudonym: row.get("pseudonym"),
        pii_kind: PiiKind::from_str(&pii_kind).map_err(SignalveilError::Database)?,
        encrypted_original: row.get("encrypted_original"),
        created_at: row.get::<_, DateTime<Utc>>("created_at"),
    })
}

#[async_trait]
impl MappingStore for PostgresMappingStore {
    async fn find(
        &self,
        tenant: &TenantId,
        original_hash: &str,
    ) -> Result<Option<PseudonymMapping>> {
        let row = self
            .client
            .query_opt(
                "SELECT tenant_id, original_hash, pseudonym, pii_kind, encrypted_original, created_at \
                 FROM pseudonym_mapping WHERE tenant_id = $1 AND original_hash = $2",
                &[&tenant.as_str(), &original_hash],
            )
            .await?;

        row.map(|r| mapping_from_row(&r)).transpose()
    }

    async fn insert_if_absent(&self, mapping: &PseudonymMapping) -> Result<bool> {
        let inserted = self
            .client
            .execute(
                "INSERT INTO pseudonym_mapping \
                 (tenant_id, original_hash, pseudonym, pii_kind, encrypted_original, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 ON CONFLICT (tenant_id, original_hash) DO NOTHING",
                &[
                    &mapping.tenant_id.as_str(),
                    &mapping.original_hash,
                    &mapping.pseudonym,
                    &mapping.pii_kind.as_str(),
                    &mapping.encrypted_original,
                    &mapping.created_at,
                ],
            )
            .await?;

        Ok(inserted == 1)
    }

    async fn delete(&self, tenant: &TenantId, original_hash: &str) -> Result<bool> {
        let deleted = self
            .client
            .execute(
                "DELETE FROM pseudonym_mapping WHERE tenant_id = $1 AND original_hash = $2",
                &[&tenant.as_str(), &original_hash],
            )
            .await?;

        Ok(deleted > 0)
    }

    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64> {
        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM pseudonym_mapping WHERE tenant_id = $1",
                &[&tenant.as_str()],
            )
            .await?;

        Ok(row.get::<_, i64>(0) as u64)
    }
}

/// Signal store over the `signals` table
pub struct PostgresSignalStore {
    client: Arc<PostgresClient>,
}

impl PostgresSignalStore {
    pub fn new(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SignalStore for PostgresSignalStore {
    async fn insert(&self, signal: &Signal) -> Result<()> {
        self.client
            .execute(
                "INSERT INTO signals \
                 (tenant_id, signal_id, category, urgency, sentiment, anonymized_content, metadata, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                &[
                    &signal.tenant_id.as_str(),
                    &signal.signal_id.as_str(),
                    &signal.category.as_str(),
                    &signal.urgency.as_str(),
                    &signal.sentiment,
                    &signal.anonymized_content,
                    &signal.metadata,
                    &signal.created_at,
                    &signal.updated_at,
                ],
            )
            .await?;

        Ok(())
    }

    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64> {
        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM signals WHERE tenant_id = $1",
                &[&tenant.as_str()],
            )
            .await?;

        Ok(row.get::<_, i64>(0) as u64)
    }
}

/// Audit store over the append-only `audit_log` table
pub struct PostgresAuditStore {
    client: Arc<PostgresClient>,
}

impl PostgresAuditStore {
    pub fn new(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }
}

fn event_from_row(row: &Row) -> Result<AuditEvent> {
    let tenant_id: String = row.get("tenant_id");
    let signal_id: Option<String> = row.get("signal_id");
    let action: String = row.get("action");

    Ok(AuditEvent {
        tenant_id: TenantId::new(tenant_id).map_err(SignalveilError::Database)?,
        signal_id: signal_id
            .map(|s| SignalId::new(s).map_err(SignalveilError::Database))
            .transpose()?,
        action: AuditAction::from_str(&action).map_err(SignalveilError::Database)?,
        actor: row.get("actor"),
        details: row.get("details"),
        timestamp: row.get::<_, DateTime<Utc>>("timestamp"),
    })
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn append(&self, event: &AuditEvent) -> Result<()> {
        let signal_id: Option<&str> = event.signal_id.as_ref().map(|s| s.as_str());

        self.client
            .execute(
                "INSERT INTO audit_log (tenant_id, signal_id, action, actor, details, timestamp) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &event.tenant_id.as_str(),
                    &signal_id,
                    &event.action.as_str(),
                    &event.actor,
                    &event.details,
                    &event.timestamp,
                ],
            )
            .await?;

        Ok(())
    }

    async fn recent(&self, tenant: &TenantId, limit: usize) -> Result<Vec<AuditEvent>> {
        let rows = self
            .client
            .query(
                "SELECT tenant_id, signal_id, action, actor, details, timestamp \
                 FROM audit_log WHERE tenant_id = $1 \
                 ORDER BY timestamp DESC LIMIT $2",
                &[&tenant.as_str(), &(limit as i64)],
            )
            .await?;

        rows.iter().map(event_from_row).collect()
    }

    async fn count_for_tenant(&self, tenant: &TenantId) -> Result<u64> {
        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM audit_log WHERE tenant_id = $1",
                &[&tenant.as_str()],
            )
            .await?;

        Ok(row.get::<_, i64>(0) as u64)
    }
}
