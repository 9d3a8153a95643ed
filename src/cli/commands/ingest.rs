//! Ingest command implementation
//!
//! Runs one feedback item through the full pipeline:
//! detect → anonymize → analyze → persist → audit.

use crate::adapters::analyzer::HttpAnalyzer;
use crate::adapters::database::memory::{MemoryAuditStore, MemoryMappingStore, MemorySignalStore};
use crate::adapters::database::{AuditStore, MappingStore, SignalStore};
use crate::adapters::postgresql::{
    PostgresAuditStore, PostgresClient, PostgresMappingStore, PostgresSignalStore,
};
use crate::config::{load_config, SignalveilConfig};
use crate::core::anonymizer::Anonymizer;
use crate::core::audit::AuditLedger;
use crate::core::detector::patterns::PatternLibrary;
use crate::core::detector::Detector;
use crate::core::ingest::IngestPipeline;
use crate::core::vault::escrow::StaticKeyProvider;
use crate::core::vault::PseudonymVault;
use crate::domain::{IngestRequest, TenantId};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Tenant to ingest under (defaults to application.default_tenant)
    #[arg(short, long)]
    pub tenant: Option<String>,

    /// Feedback content given inline
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Read feedback content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Source channel of the feedback
    #[arg(long, default_value = "email")]
    pub source: String,

    /// Additional metadata as a JSON object
    #[arg(long)]
    pub metadata: Option<String>,

    /// Dry run mode - process in memory without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    /// Execute the ingest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting ingest command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let content = match self.read_content() {
            Ok(c) => c,
            Err(msg) => {
                println!("❌ {msg}");
                return Ok(3); // Input validation exit code
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

        let metadata = match &self.metadata {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    println!("❌ Invalid metadata JSON: {e}");
                    return Ok(3);
                }
            },
            None => None,
        };

        let pipeline = match build_pipeline(&config, self.dry_run).await {
            Ok(p) => p,
            Err(PipelineBuildError::Configuration(e)) => {
                println!("❌ {e}");
                return Ok(2);
            }
            Err(PipelineBuildError::Connection(e)) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if self.dry_run {
            println!("🧪 Dry run: in-memory stores, nothing is persisted");
        }
        println!("🔒 Processing feedback for tenant {tenant}");
        println!();

        let request = IngestRequest {
            tenant_id: tenant,
            content,
            source: self.source.clone(),
            metadata,
        };

        match pipeline.ingest(request).await {
            Ok(outcome) => {
                println!("✅ Feedback processed");
                println!();
                println!("  Signal ID:    {}", outcome.signal_id);
                println!("  PII detected: {}", outcome.pii_detected);
                println!("  Category:     {}", outcome.category);
                println!("  Urgency:      {}", outcome.urgency);
                println!("  Sentiment:    {:+.2}", outcome.sentiment);
                println!("  Preview:      {}", outcome.anonymized_preview);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Ingestion failed");
                println!("   Error: {e}");
                if e.is_retryable() {
                    println!("   The failure looks transient; retrying may succeed.");
                }
                Ok(5) // Fatal error exit code
            }
        }
    }

    fn read_content(&self) -> Result<String, String> {
        match (&self.content, &self.file) {
            (Some(content), None) => Ok(content.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
            (None, None) => Err("Provide feedback via --content or --file".to_string()),
            (Some(_), Some(_)) => unreachable!("clap rejects conflicting arguments"),
        }
    }
}

enum PipelineBuildError {
    Configuration(String),
    Connection(String),
}

/// Assemble the pipeline from configuration
///
/// Dry runs swap the PostgreSQL stores for in-memory ones; everything else
/// is identical to the real path.
async fn build_pipeline(
    config: &SignalveilConfig,
    dry_run: bool,
) -> Result<IngestPipeline, PipelineBuildError> {
    let library = match &config.detection.pattern_library {
        Some(path) => PatternLibrary::from_file(path),
        None => PatternLibrary::embedded_default(),
    }
    .map_err(|e| PipelineBuildError::Configuration(e.to_string()))?;

    let detector = Detector::new(Arc::new(library), config.detection.locale)
        .map_err(|e| PipelineBuildError::Configuration(e.to_string()))?;

    let keys = StaticKeyProvider::from_base64(&config.vault.encryption_key)
        .map_err(|e| PipelineBuildError::Configuration(e.to_string()))?;

    let analyzer = HttpAnalyzer::new(&config.analyzer, config.detection.locale)
        .map_err(|e| PipelineBuildError::Configuration(e.to_string()))?;

    let (mappings, signals, audits): (
        Arc<dyn MappingStore>,
        Arc<dyn SignalStore>,
        Arc<dyn AuditStore>,
    ) = if dry_run {
        (
            Arc::new(MemoryMappingStore::new()),
            Arc::new(MemorySignalStore::new()),
            Arc::new(MemoryAuditStore::new()),
        )
    } else {
        let client = PostgresClient::new(config.database.clone())
            .await
            .map_err(|e| PipelineBuildError::Connection(e.to_string()))?;
        client
            .test_connection()
            .await
            .map_err(|e| PipelineBuildError::Connection(e.to_string()))?;
        client
            .ensure_schema()
            .await
            .map_err(|e| PipelineBuildError::Connection(e.to_string()))?;

        let client = Arc::new(client);
        (
            Arc::new(PostgresMappingStore::new(client.clone())),
            Arc::new(PostgresSignalStore::new(client.clone())),
            Arc::new(PostgresAuditStore::new(client)),
        )
    };

    let vault = Arc::new(PseudonymVault::new(mappings, Arc::new(keys)));

    Ok(IngestPipeline::new(
        detector,
        Anonymizer::new(vault),
        Arc::new(analyzer),
        signals,
        AuditLedger::new(audits),
        config.detection.locale,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_content_inline() {
        let args = IngestArgs {
            tenant: None,
            content: Some("hello".to_string()),
            file: None,
            source: "email".to_string(),
            metadata: None,
            dry_run: false,
        };
        assert_eq!(args.read_content().unwrap(), "hello");
    }

    #[test]
    fn test_read_content_requires_input() {
        let args = IngestArgs {
            tenant: None,
            content: None,
            file: None,
            source: "email".to_string(),
            metadata: None,
            dry_run: false,
        };
        assert!(args.read_content().is_err());
    }

    #[test]
    fn test_read_content_missing_file() {
        let args = IngestArgs {
            tenant: None,
            content: None,
            file: Some(PathBuf::from("/nonexistent/feedback.txt")),
            source: "email".to_string(),
            metadata: None,
            dry_run: false,
        };
        assert!(args.read_content().is_err());
    }
}
