//! Append-only audit ledger
//!
//! Every mutation of customer data gets a ledger entry. Writes are
//! best-effort: a failed append must never abort or roll back the primary
//! ingestion flow, so `record` returns an [`AuditOutcome`] the orchestrator
//! routes to observability and deliberately ignores for control flow.
//! Ledger completeness is monitored out-of-band.

use crate::adapters::database::AuditStore;
use crate::domain::{AuditAction, AuditEvent, Result, SignalId, TenantId};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

/// Outcome of a ledger write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Event durably appended
    Recorded,
    /// Event lost; reason for operational logs
    Dropped { reason: String },
}

impl AuditOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Best-effort audit ledger over an append-only store
pub struct AuditLedger {
    store: Arc<dyn AuditStore>,
}

impl AuditLedger {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append one event with a server-side timestamp
    ///
    /// The actor defaults to "system". Store failures are logged and
    /// reported as [`AuditOutcome::Dropped`], never raised.
    pub async fn record(
        &self,
        tenant: &TenantId,
        action: AuditAction,
        signal_id: Option<&SignalId>,
        actor: Option<&str>,
        details: Option<Value>,
    ) -> AuditOutcome {
        let event = AuditEvent {
            tenant_id: tenant.clone(),
            signal_id: signal_id.cloned(),
            action,
            actor: actor.unwrap_or("system").to_string(),
            details,
            timestamp: Utc::now(),
        };

        match self.store.append(&event).await {
            Ok(()) => {
                tracing::debug!(
                    tenant = %tenant,
                    action = %action,
                    "Audit event recorded"
                );
                AuditOutcome::Recorded
            }
            Err(e) => {
                tracing::error!(
                    tenant = %tenant,
                    action = %action,
                    error = %e,
                    "Failed to record audit event"
                );
                AuditOutcome::Dropped {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Most recent events for a tenant, newest first
    pub async fn recent(&self, tenant: &TenantId, limit: usize) -> Result<Vec<AuditEvent>> {
        self.store.recent(tenant, limit).await
    }
}
