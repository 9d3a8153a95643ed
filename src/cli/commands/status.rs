//! Status command implementation
//!
//! Shows collaborator health and per-tenant store counts: signals
//! processed, pseudonym mappings held in escrow, audit trail entries, and
//! the most recent audit events.

use crate::adapters::analyzer::HttpAnalyzer;
use crate::adapters::database::{AuditStore, MappingStore, SignalStore};
use crate::adapters::postgresql::{
    PostgresAuditStore, PostgresClient, PostgresMappingStore, PostgresSignalStore,
};
use crate::config::load_config;
use crate::domain::TenantId;
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Tenant to report on (defaults to application.default_tenant)
    #[arg(short, long)]
    pub tenant: Option<String>,

    /// Number of recent audit events to show
    #[arg(long, default_value_t = 5)]
    pub recent: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking status");

        println!("📊 Signalveil Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let tenant_name = self
            .tenant
            .clone()
            .unwrap_or_else(|| config.application.default_tenant.clone());
        let tenant = match TenantId::new(tenant_name) {
            Ok(t) => t,
            Err(e) => {
                println!("❌ Invalid tenant: {e}");
                return Ok(3);
            }
        };

        // Database health
        let client = match PostgresClient::new(config.database.clone()).await {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };
        match client.test_connection().await {
            Ok(()) => println!("  Database:  ✅ healthy"),
            Err(e) => {
                println!("  Database:  ❌ unhealthy ({e})");
                return Ok(4);
            }
        }

        // Analyzer health; degraded is fine, the fallback covers it
        match HttpAnalyzer::new(&config.analyzer, config.detection.locale) {
            Ok(analyzer) => match analyzer.health_check().await {
                Ok(()) => println!("  Analyzer:  ✅ healthy"),
                Err(e) => {
                    println!("  Analyzer:  ⚠️  unreachable ({e})");
                    println!("             Ingestion continues with the local fallback analysis.");
                }
            },
            Err(e) => {
                println!("  Analyzer:  ❌ misconfigured ({e})");
                return Ok(2);
            }
        }
        println!();

        let client = Arc::new(client);
        let mappings = PostgresMappingStore::new(client.clone());
        let signals = PostgresSignalStore::new(client.clone());
        let audits = PostgresAuditStore::new(client);

        println!("Tenant: {tenant}");
        match tenant_counts(&signals, &mappings, &audits, &tenant).await {
            Ok((signal_count, mapping_count, audit_count)) => {
                println!("  Signals processed:   {signal_count}");
                println!("  Pseudonym mappings:  {mapping_count}");
                println!("  Audit trail entries: {audit_count}");
                if signal_count > 0 && audit_count == 0 {
                    println!("  ⚠️  Signals exist but the audit trail is empty");
                }
            }
            Err(e) => {
                println!("❌ Failed to read store counts");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        }

        if self.recent > 0 {
            println!();
            match audits.recent(&tenant, self.recent).await {
                Ok(events) if events.is_empty() => {
                    println!("No audit events recorded yet.");
                }
                Ok(events) => {
                    println!("Recent audit events:");
                    println!(
                        "{:<22} {:<8} {:<10} {:<18}",
                        "Timestamp", "Action", "Actor", "Signal"
                    );
                    println!("{}", "-".repeat(60));
                    for event in events {
                        println!(
                            "{:<22} {:<8} {:<10} {:<18}",
                            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                            event.action,
                            event.actor,
                            event
                                .signal_id
                                .as_ref()
                                .map(|s| s.as_str().to_string())
                                .unwrap_or_else(|| "-".to_string()),
                        );
                    }
                }
                Err(e) => {
                    println!("❌ Failed to load audit events");
                    println!("   Error: {e}");
                    return Ok(5);
                }
            }
        }

        Ok(0)
    }
}

async fn tenant_counts(
    signals: &PostgresSignalStore,
    mappings: &PostgresMappingStore,
    audits: &PostgresAuditStore,
    tenant: &TenantId,
) -> crate::domain::Result<(u64, u64, u64)> {
    Ok((
        signals.count_for_tenant(tenant).await?,
        mappings.count_for_tenant(tenant).await?,
        audits.count_for_tenant(tenant).await?,
    ))
}
