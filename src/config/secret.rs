//! Secure credential handling using the secrecy crate
//!
//! Sensitive configuration values (the escrow encryption key, analyzer
//! credentials) are wrapped in `Secret<T>` so their memory is zeroed on drop
//! and accidental `Debug` logging prints `[REDACTED]` instead of the value.

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the traits `Secret` requires
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Helper to create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Newtype wrapper for a 256-bit escrow key
///
/// Kept separate from [`SecretValue`] so decoded key material never lives in
/// an unprotected `Vec<u8>` longer than the decode itself.
#[derive(Clone, Zeroize)]
pub struct KeyBytes(pub [u8; 32]);

impl CloneableSecret for KeyBytes {}
impl DebugSecret for KeyBytes {}

/// Type alias for a secret 256-bit key
pub type SecretKey = Secret<KeyBytes>;
