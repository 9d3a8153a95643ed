//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers flowing through the pipeline.
//! Tenant isolation hangs off [`TenantId`], so it is validated at the
//! boundary rather than passed around as a bare string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tenant identifier newtype wrapper
///
/// Pseudonym mappings and audit entries are partitioned by tenant; an empty
/// tenant would silently collapse that partitioning, so construction rejects it.
///
/// # Examples
///
/// ```
/// use signalveil::domain::ids::TenantId;
///
/// let tenant = TenantId::new("acme-at").unwrap();
/// assert_eq!(tenant.as_str(), "acme-at");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new TenantId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Tenant ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the tenant ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Signal identifier newtype wrapper
///
/// Format: `sig_` followed by 12 hex characters, generated per ingestion.
///
/// # Examples
///
/// ```
/// use signalveil::domain::ids::SignalId;
///
/// let id = SignalId::generate();
/// assert!(id.as_str().starts_with("sig_"));
/// assert_eq!(id.as_str().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalId(String);

impl SignalId {
    /// Generates a fresh signal identifier
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("sig_{}", &hex[..12]))
    }

    /// Creates a SignalId from an existing string (e.g. loaded from storage)
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if !id.starts_with("sig_") || id.len() != 16 {
            return Err(format!("Invalid signal ID format: {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the signal ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SignalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SignalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_rejects_empty() {
        assert!(TenantId::new("").is_err());
        assert!(TenantId::new("   ").is_err());
        assert!(TenantId::new("tenant-1").is_ok());
    }

    #[test]
    fn test_signal_id_generate_format() {
        let id = SignalId::generate();
        assert!(id.as_str().starts_with("sig_"));
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str()[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signal_id_uniqueness() {
        let a = SignalId::generate();
        let b = SignalId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_signal_id_roundtrip() {
        let id = SignalId::generate();
        let parsed = SignalId::from_str(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_signal_id_rejects_malformed() {
        assert!(SignalId::new("sig_short").is_err());
        assert!(SignalId::new("nope_abcdef123456").is_err());
    }
}
