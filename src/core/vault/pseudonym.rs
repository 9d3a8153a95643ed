//! Deterministic pseudonym generation
//!
//! The token is a pure function of the original value: a SHA-256 digest
//! indexes into two fixed word lists, and the PII kind contributes a short
//! suffix so tokens stay visually distinguishable by category. Tenancy plays
//! no role here; only a mapping's existence is tenant-scoped.

use crate::domain::PiiKind;
use sha2::{Digest, Sha256};

/// Alpine-themed qualifiers
const ADJECTIVES: [&str; 20] = [
    "alpine", "sunny", "snowy", "cozy", "foggy", "misty", "breezy", "rocky", "meadow", "crystal",
    "golden", "silver", "munchy", "happy", "sleepy", "zippy", "bouncy", "fluffy", "wise", "brave",
];

/// Alpine-themed animals
const ANIMALS: [&str; 20] = [
    "marmot",
    "chamois",
    "ibex",
    "deer",
    "eagle",
    "otter",
    "beaver",
    "fox",
    "badger",
    "lynx",
    "owl",
    "falcon",
    "hare",
    "squirrel",
    "hedgehog",
    "trout",
    "salamander",
    "bat",
    "woodpecker",
    "bear",
];

/// Generate the pseudonym token for an original value
///
/// Pure and deterministic: the same `(original, kind)` pair always yields
/// the same token.
pub fn generate(original: &str, kind: PiiKind) -> String {
    let digest = Sha256::digest(original.as_bytes());
    let mut prefix = [0u8; 16];
    prefix.copy_from_slice(&digest[..16]);
    let hash_value = u128::from_be_bytes(prefix);

    let adjective = ADJECTIVES[(hash_value % ADJECTIVES.len() as u128) as usize];
    let animal =
        ANIMALS[((hash_value / ADJECTIVES.len() as u128) % ANIMALS.len() as u128) as usize];

    format!("{adjective}-{animal}{}", kind_suffix(kind))
}

/// Kind-specific suffix appended to the token
fn kind_suffix(kind: PiiKind) -> &'static str {
    match kind {
        PiiKind::Email => "@example.local",
        PiiKind::PhoneAt => ".at",
        PiiKind::PhoneDe => ".de",
        PiiKind::Iban => ".iban",
        PiiKind::IpAddress => ".ip",
        PiiKind::CreditCard => ".card",
        PiiKind::NationalId => ".ssn",
        PiiKind::PostalCode | PiiKind::FirstName | PiiKind::FullName => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = generate("max.mustermann@example.com", PiiKind::Email);
        let b = generate("max.mustermann@example.com", PiiKind::Email);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_values_usually_differ() {
        let a = generate("alice@example.com", PiiKind::Email);
        let b = generate("bob@example.com", PiiKind::Email);
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_suffix_applied() {
        let email = generate("value", PiiKind::Email);
        assert!(email.ends_with("@example.local"));

        let iban = generate("value", PiiKind::Iban);
        assert!(iban.ends_with(".iban"));

        let name = generate("value", PiiKind::FullName);
        assert!(!name.contains('.') && !name.contains('@'));
    }

    #[test]
    fn test_token_shape() {
        let token = generate("Anna", PiiKind::FirstName);
        let parts: Vec<&str> = token.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(ADJECTIVES.contains(&parts[0]));
        assert!(ANIMALS.contains(&parts[1]));
    }

    #[test]
    fn test_same_value_same_stem_across_kinds() {
        // The kind affects only the suffix
        let a = generate("1234 567890", PiiKind::NationalId);
        let b = generate("1234 567890", PiiKind::CreditCard);
        assert_eq!(
            a.trim_end_matches(".ssn"),
            b.trim_end_matches(".card")
        );
    }
}
