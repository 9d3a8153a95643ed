//! # Signalveil - Privacy-first customer feedback ingestion
//!
//! Signalveil ingests free-text customer feedback that may contain
//! personally identifiable information (PII) and produces an anonymized,
//! classified signal suitable for downstream analysis, while keeping a
//! reversible, access-controlled mapping from pseudonym back to original
//! value and an append-only audit trail of every transformation.
//!
//! ## Overview
//!
//! For each ingested feedback item the pipeline:
//! - **Detects** PII spans with a pattern library (structural regexes plus
//!   locale name heuristics)
//! - **Pseudonymizes** each span with a deterministic token, escrowing the
//!   original value as AES-256-GCM ciphertext
//! - **Classifies** the anonymized text via an external analyzer, falling
//!   back to a local keyword heuristic when the analyzer is unavailable
//! - **Persists** the resulting signal and **records** an audit event
//!
//! Raw content never crosses the analysis boundary, only anonymized text
//! does. Pseudonym mappings and audit entries are partitioned by tenant.
//!
//! ## Architecture
//!
//! Signalveil follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (detector, vault, anonymizer, analysis, audit, ingest)
//! - [`adapters`] - External integrations (PostgreSQL, analyzer HTTP client)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use signalveil::config::Locale;
//! use signalveil::core::detector::Detector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector = Detector::with_defaults(Locale::DeAt)?;
//! let detections = detector.detect("Kontakt: max.mustermann@example.com");
//!
//! assert_eq!(detections.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Running the full pipeline requires wiring the stores and collaborators:
//!
//! ```rust,no_run
//! use signalveil::adapters::analyzer::HttpAnalyzer;
//! use signalveil::adapters::database::memory::{
//!     MemoryAuditStore, MemoryMappingStore, MemorySignalStore,
//! };
//! use signalveil::config::load_config;
//! use signalveil::core::anonymizer::Anonymizer;
//! use signalveil::core::audit::AuditLedger;
//! use signalveil::core::detector::Detector;
//! use signalveil::core::ingest::IngestPipeline;
//! use signalveil::core::vault::{escrow::StaticKeyProvider, PseudonymVault};
//! use signalveil::domain::{IngestRequest, TenantId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("signalveil.toml")?;
//!
//! let detector = Detector::with_defaults(config.detection.locale)?;
//! let keys = StaticKeyProvider::from_base64(&config.vault.encryption_key)?;
//! let vault = Arc::new(PseudonymVault::new(
//!     Arc::new(MemoryMappingStore::new()),
//!     Arc::new(keys),
//! ));
//! let analyzer = HttpAnalyzer::new(&config.analyzer, config.detection.locale)?;
//!
//! let pipeline = IngestPipeline::new(
//!     detector,
//!     Anonymizer::new(vault),
//!     Arc::new(analyzer),
//!     Arc::new(MemorySignalStore::new()),
//!     AuditLedger::new(Arc::new(MemoryAuditStore::new())),
//!     config.detection.locale,
//! );
//!
//! let outcome = pipeline
//!     .ingest(IngestRequest {
//!         tenant_id: TenantId::new("acme-at")?,
//!         content: "Ich bin Anna, max@example.com, die Lieferung fehlt!".to_string(),
//!         source: "email".to_string(),
//!         metadata: None,
//!     })
//!     .await?;
//!
//! println!("{}: {} PII spans replaced", outcome.signal_id, outcome.pii_detected);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with the
//! [`domain::SignalveilError`] taxonomy. Failures before the signal row is
//! persisted are fatal for the request; analyzer failures degrade to the
//! local fallback and audit-write failures are swallowed by design.
//!
//! ## Logging
//!
//! Signalveil uses structured logging with the `tracing` crate. PII values
//! are never logged in plaintext, only counts and kinds.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
