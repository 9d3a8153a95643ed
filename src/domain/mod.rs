//! Domain models and types for Signalveil.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TenantId`], [`SignalId`])
//! - **Pipeline models** ([`Detection`], [`AnonymizationResult`], [`Signal`], [`AuditEvent`])
//! - **Error types** ([`SignalveilError`])
//! - **Result type alias** ([`Result`])
//!
//! Identifiers use the newtype pattern so a tenant id can never be passed
//! where a signal id is expected:
//!
//! ```rust
//! use signalveil::domain::{TenantId, SignalId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tenant = TenantId::new("acme-at")?;
//! let signal = SignalId::generate();
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod signal;

// Re-export commonly used types for convenience
pub use errors::SignalveilError;
pub use ids::{SignalId, TenantId};
pub use result::Result;
pub use signal::{
    AnalysisResult, AnonymizationResult, AuditAction, AuditEvent, Category, Detection,
    IngestOutcome, IngestRequest, PiiKind, PseudonymMapping, Signal, Substitution, Urgency,
};
