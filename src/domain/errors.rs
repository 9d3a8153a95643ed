//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.
//! The variants mirror the pipeline's failure policy: `Vault`, `Database`
//! and `Persistence` are fatal for a request, `Analysis` is recovered via
//! the local fallback, and `AuditWrite` is swallowed by the ledger.

use thiserror::Error;

/// Main Signalveil error type
#[derive(Debug, Error)]
pub enum SignalveilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// PII detection errors. Detection is pure computation over text,
    /// so this variant indicates a defect (e.g. an invalid pattern
    /// library), not a runtime condition.
    #[error("Detection error: {0}")]
    Detection(String),

    /// Pseudonym vault errors (store connectivity or escrow encryption
    /// during get-or-create). Fatal for the request, retryable by the caller.
    #[error("Vault error: {0}")]
    Vault(String),

    /// External analyzer errors (timeout, transport, malformed response).
    /// Never surfaced to callers; the orchestrator substitutes the local
    /// fallback analysis.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Audit ledger write failures. Logged and swallowed by the ledger.
    #[error("Audit write error: {0}")]
    AuditWrite(String),

    /// Failure storing the final signal record. Fatal, surfaced to caller.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Database-related errors (pooling, migration, generic store plumbing)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl SignalveilError {
    /// Whether the caller may retry the request unchanged.
    ///
    /// Store connectivity and vault failures are transient by nature;
    /// configuration and validation failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Vault(_) | Self::Database(_) | Self::Persistence(_)
        )
    }
}

impl From<std::io::Error> for SignalveilError {
    fn from(err: std::io::Error) -> Self {
        SignalveilError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SignalveilError {
    fn from(err: serde_json::Error) -> Self {
        SignalveilError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SignalveilError {
    fn from(err: toml::de::Error) -> Self {
        SignalveilError::Configuration(format!("TOML parse error: {err}"))
    }
}
