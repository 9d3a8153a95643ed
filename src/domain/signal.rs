//! Core data models for the ingestion pipeline
//!
//! `Detection` and `AnonymizationResult` are transient, owned by the single
//! ingestion call that created them. `PseudonymMapping`, `Signal` and
//! `AuditEvent` are the persistent records owned by the vault, the signal
//! store and the audit ledger respectively.

use crate::domain::ids::{SignalId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// PII entity kinds recognized by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiKind {
    /// Email addresses
    Email,
    /// Austrian phone numbers (+43 / 0043 / 0 prefix)
    PhoneAt,
    /// German phone numbers (+49 / 0049 prefix)
    PhoneDe,
    /// International bank account numbers
    Iban,
    /// IPv4 addresses
    IpAddress,
    /// Credit card numbers (four digit groups)
    CreditCard,
    /// National insurance numbers (4+6 digit shape)
    NationalId,
    /// Postal codes followed by a place name
    PostalCode,
    /// Bare first names from the locale name set
    FirstName,
    /// Full names extracted from contextual phrases
    FullName,
}

impl PiiKind {
    /// Human-readable label for logs and audit details
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::PhoneAt => "PHONE_AT",
            Self::PhoneDe => "PHONE_DE",
            Self::Iban => "IBAN",
            Self::IpAddress => "IP_ADDRESS",
            Self::CreditCard => "CREDIT_CARD",
            Self::NationalId => "NATIONAL_ID",
            Self::PostalCode => "POSTAL_CODE",
            Self::FirstName => "FIRST_NAME",
            Self::FullName => "FULL_NAME",
        }
    }

    /// Wire name used in the pattern library and storage columns
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::PhoneAt => "phone_at",
            Self::PhoneDe => "phone_de",
            Self::Iban => "iban",
            Self::IpAddress => "ip_address",
            Self::CreditCard => "credit_card",
            Self::NationalId => "national_id",
            Self::PostalCode => "postal_code",
            Self::FirstName => "first_name",
            Self::FullName => "full_name",
        }
    }
}

impl FromStr for PiiKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone_at" => Ok(Self::PhoneAt),
            "phone_de" => Ok(Self::PhoneDe),
            "iban" => Ok(Self::Iban),
            "ip_address" => Ok(Self::IpAddress),
            "credit_card" => Ok(Self::CreditCard),
            "national_id" => Ok(Self::NationalId),
            "postal_code" => Ok(Self::PostalCode),
            "first_name" => Ok(Self::FirstName),
            "full_name" => Ok(Self::FullName),
            _ => Err(format!("Unknown PII kind: {s}")),
        }
    }
}

impl fmt::Display for PiiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detected PII span within a source text
///
/// Offsets are half-open byte offsets into the source (`end` exclusive),
/// always aligned to character boundaries since they come from regex matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Kind of PII detected
    pub kind: PiiKind,
    /// The matched substring
    pub value: String,
    /// Start offset in the source text
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Detection confidence (0.0 - 1.0)
    pub confidence: f32,
}

impl Detection {
    /// Whether this span intersects another half-open span
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        !(end <= self.start || start >= self.end)
    }
}

/// One substitution performed by the anonymizer
///
/// `position` is the original start offset, kept for audit summaries; it is
/// not valid for re-insertion into the anonymized text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    /// Kind of PII replaced
    pub kind: PiiKind,
    /// Pseudonym token substituted for the original value
    pub pseudonym: String,
    /// Start offset of the original span
    pub position: usize,
}

/// Result of anonymizing one text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationResult {
    /// The rewritten text with `[pseudonym]` spans
    pub anonymized_text: String,
    /// Substitution records in ascending position order
    pub substitutions: Vec<Substitution>,
}

/// Persistent pseudonym mapping row, owned by the vault
///
/// Keyed by `(tenant_id, original_hash)`; immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PseudonymMapping {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// `hex(SHA-256(tenant_id ':' original_value))`
    pub original_hash: String,
    /// Deterministic human-readable token
    pub pseudonym: String,
    /// Kind of the escrowed value
    pub pii_kind: PiiKind,
    /// Base64 `nonce || ciphertext` of the original value
    pub encrypted_original: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Feedback category assigned by analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Complaint,
    Request,
    Question,
    Praise,
    Suggestion,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complaint => "complaint",
            Self::Request => "request",
            Self::Question => "question",
            Self::Praise => "praise",
            Self::Suggestion => "suggestion",
            Self::Unknown => "unknown",
        }
    }

    /// Lenient parse: analyzer responses outside the vocabulary map to Unknown
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "complaint" => Self::Complaint,
            "request" => Self::Request,
            "question" => Self::Question,
            "praise" => Self::Praise,
            "suggestion" => Self::Suggestion,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Urgency level assigned by analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Lenient parse: unrecognized values fall back to Medium
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of content analysis (external or fallback)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Feedback category
    pub category: Category,
    /// Urgency level
    pub urgency: Urgency,
    /// Sentiment score in [-1.0, 1.0]
    pub sentiment: f64,
    /// Brief summary of the feedback
    pub summary: String,
}

/// Persisted, anonymized, classified representation of one feedback item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub tenant_id: TenantId,
    pub signal_id: SignalId,
    pub category: Category,
    pub urgency: Urgency,
    pub sentiment: f64,
    pub anonymized_content: String,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit action vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Ingest,
    Access,
    Export,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingest => "INGEST",
            Self::Access => "ACCESS",
            Self::Export => "EXPORT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INGEST" => Ok(Self::Ingest),
            "ACCESS" => Ok(Self::Access),
            "EXPORT" => Ok(Self::Export),
            "DELETE" => Ok(Self::Delete),
            _ => Err(format!("Unknown audit action: {s}")),
        }
    }
}

/// Append-only audit record, owned by the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub tenant_id: TenantId,
    pub signal_id: Option<SignalId>,
    pub action: AuditAction,
    /// Defaults to "system" when not supplied
    pub actor: String,
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// One feedback item handed to the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub tenant_id: TenantId,
    /// Raw feedback content; never leaves the pipeline boundary
    pub content: String,
    /// Source channel (email, web form, ...)
    #[serde(default = "default_source")]
    pub source: String,
    pub metadata: Option<Value>,
}

fn default_source() -> String {
    "email".to_string()
}

/// Ingestion result returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub signal_id: SignalId,
    pub status: String,
    pub pii_detected: usize,
    pub category: Category,
    pub urgency: Urgency,
    pub sentiment: f64,
    /// Anonymized text truncated to 200 characters
    pub anonymized_preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pii_kind_roundtrip() {
        for kind in [
            PiiKind::Email,
            PiiKind::PhoneAt,
            PiiKind::PhoneDe,
            PiiKind::Iban,
            PiiKind::IpAddress,
            PiiKind::CreditCard,
            PiiKind::NationalId,
            PiiKind::PostalCode,
            PiiKind::FirstName,
            PiiKind::FullName,
        ] {
            assert_eq!(PiiKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_detection_overlap() {
        let d = Detection {
            kind: PiiKind::Email,
            value: "a@b.cd".to_string(),
            start: 10,
            end: 16,
            confidence: 1.0,
        };
        assert!(d.overlaps(12, 14));
        assert!(d.overlaps(5, 11));
        assert!(d.overlaps(15, 20));
        assert!(!d.overlaps(0, 10));
        assert!(!d.overlaps(16, 20));
    }

    #[test]
    fn test_category_lenient_parse() {
        assert_eq!(Category::parse_lenient("Complaint"), Category::Complaint);
        assert_eq!(Category::parse_lenient(" praise "), Category::Praise);
        assert_eq!(Category::parse_lenient("nonsense"), Category::Unknown);
    }

    #[test]
    fn test_urgency_lenient_parse_defaults_to_medium() {
        assert_eq!(Urgency::parse_lenient("CRITICAL"), Urgency::Critical);
        assert_eq!(Urgency::parse_lenient("whatever"), Urgency::Medium);
    }

    #[test]
    fn test_audit_action_wire_format() {
        assert_eq!(AuditAction::Ingest.as_str(), "INGEST");
        let json = serde_json::to_string(&AuditAction::Delete).unwrap();
        assert_eq!(json, "\"DELETE\"");
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Complaint).unwrap();
        assert_eq!(json, "\"complaint\"");
        let parsed: Category = serde_json::from_str("\"praise\"").unwrap();
        assert_eq!(parsed, Category::Praise);
    }
}
