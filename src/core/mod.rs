//! Core pipeline logic for Signalveil.
//!
//! Components, leaves first: the [`detector`] scans raw text against the
//! pattern library, the [`vault`] assigns deterministic pseudonyms with
//! encrypted escrow, the [`anonymizer`] rewrites detected spans, the
//! [`audit`] ledger records every transformation, and [`ingest`] sequences
//! one feedback item end to end with [`analysis`] in between.

pub mod analysis;
pub mod anonymizer;
pub mod audit;
pub mod detector;
pub mod ingest;
pub mod vault;

pub use analysis::AnalysisProvider;
pub use anonymizer::Anonymizer;
pub use audit::{AuditLedger, AuditOutcome};
pub use detector::Detector;
pub use ingest::IngestPipeline;
pub use vault::PseudonymVault;
