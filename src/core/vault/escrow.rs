//! Escrow encryption for original PII values
//!
//! Original values are retained only as AES-256-GCM ciphertext, recoverable
//! with the key a [`KeyProvider`] hands out. The provider is a capability
//! passed to the vault at construction, so key rotation or per-tenant keys
//! never touch call sites.

use crate::config::{KeyBytes, SecretKey, SecretString};
use crate::domain::{Result, SignalveilError, TenantId};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};

const NONCE_LEN: usize = 12;

/// Capability that yields the escrow key for a tenant
pub trait KeyProvider: Send + Sync {
    /// 256-bit data key used for a tenant's escrow entries
    fn data_key(&self, tenant: &TenantId) -> Result<SecretKey>;
}

/// Key provider backed by a single process-wide key
pub struct StaticKeyProvider {
    key: SecretKey,
}

impl StaticKeyProvider {
    /// Build from a base64-encoded 32-byte key (the configuration format)
    pub fn from_base64(encoded: &SecretString) -> Result<Self> {
        let decoded = BASE64
            .decode(encoded.expose_secret().as_ref())
            .map_err(|e| SignalveilError::Configuration(format!("Invalid escrow key: {e}")))?;
        if decoded.len() != 32 {
            return Err(SignalveilError::Configuration(format!(
                "Escrow key must be 32 bytes, got {}",
                decoded.len()
            )));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&decoded);
        Ok(Self::new(key))
    }

    /// Build from raw key bytes
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key: Secret::new(KeyBytes(key)),
        }
    }
}

impl KeyProvider for StaticKeyProvider {
    fn data_key(&self, _tenant: &TenantId) -> Result<SecretKey> {
        Ok(self.key.clone())
    }
}

/// Authenticated encryption for escrowed originals
///
/// Ciphertext layout: base64 of `nonce (12 bytes) || AES-256-GCM ciphertext`.
pub struct EscrowCipher {
    keys: std::sync::Arc<dyn KeyProvider>,
}

impl EscrowCipher {
    pub fn new(keys: std::sync::Arc<dyn KeyProvider>) -> Self {
        Self { keys }
    }

    /// Encrypt an original value under the tenant's key
    pub fn encrypt(&self, tenant: &TenantId, plaintext: &str) -> Result<String> {
        let key = self.keys.data_key(tenant)?;
        let cipher = Aes256Gcm::new_from_slice(&key.expose_secret().0)
            .map_err(|_| SignalveilError::Vault("Invalid escrow key length".to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| SignalveilError::Vault("Escrow encryption failed".to_string()))?;

        let mut buf = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        buf.extend_from_slice(&nonce_bytes);
        buf.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(buf))
    }

    /// Decrypt an escrowed value under the tenant's key
    pub fn decrypt(&self, tenant: &TenantId, encoded: &str) -> Result<String> {
        let raw = BASE64
            .decode(encoded)
            .map_err(|e| SignalveilError::Vault(format!("Invalid escrow ciphertext: {e}")))?;
        if raw.len() <= NONCE_LEN {
            return Err(SignalveilError::Vault(
                "Escrow ciphertext too short".to_string(),
            ));
        }

        let key = self.keys.data_key(tenant)?;
        let cipher = Aes256Gcm::new_from_slice(&key.expose_secret().0)
            .map_err(|_| SignalveilError::Vault("Invalid escrow key length".to_string()))?;

        let nonce = Nonce::from_slice(&raw[..NONCE_LEN]);
        let plaintext = cipher
            .decrypt(nonce, &raw[NONCE_LEN..])
            .map_err(|_| SignalveilError::Vault("Escrow decryption failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|_| SignalveilError::Vault("Escrowed value is not valid UTF-8".to_string()))
    }
}
