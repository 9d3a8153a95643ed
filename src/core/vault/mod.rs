//! Pseudonym vault
//!
//! Tenant-scoped, content-addressed store of pseudonym mappings with
//! get-or-create semantics. Rows are immutable after creation; deletion is
//! the only lifecycle event, driven externally through [`PseudonymVault::delete`].
//!
//! Concurrent first-creation of the same `(tenant, original)` pair is
//! resolved by the store's uniqueness constraint plus a re-read, not by
//! application-level locking.

pub mod escrow;
pub mod pseudonym;

use crate::domain::{PiiKind, PseudonymMapping, Result, SignalveilError, TenantId};
use chrono::Utc;
use escrow::{EscrowCipher, KeyProvider};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::adapters::database::MappingStore;

/// Tenant-scoped pseudonym vault
pub struct PseudonymVault {
    store: Arc<dyn MappingStore>,
    cipher: EscrowCipher,
}

impl PseudonymVault {
    /// Create a vault over a mapping store with an escrow key capability
    pub fn new(store: Arc<dyn MappingStore>, keys: Arc<dyn KeyProvider>) -> Self {
        Self {
            store,
            cipher: EscrowCipher::new(keys),
        }
    }

    /// Content address of an original value within a tenant:
    /// `hex(SHA-256(tenant ':' original))`
    pub fn original_hash(tenant: &TenantId, original: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(tenant.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(original.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Return the pseudonym for an original value, creating the mapping on
    /// first occurrence
    ///
    /// A second call for the same value under the same tenant returns the
    /// identical pseudonym without writing. If a concurrent caller created
    /// the mapping between lookup and insert, the pre-existing row is
    /// authoritative.
    ///
    /// # Errors
    ///
    /// Returns a `Vault` error (retryable) on store or encryption failure.
    pub async fn get_or_create(
        &self,
        tenant: &TenantId,
        original: &str,
        kind: PiiKind,
    ) -> Result<String> {
        let hash = Self::original_hash(tenant, original);

        if let Some(existing) = self
            .store
            .find(tenant, &hash)
            .await
            .map_err(|e| SignalveilError::Vault(format!("Mapping lookup failed: {e}")))?
        {
            return Ok(existing.pseudonym);
        }

        let token = pseudonym::generate(original, kind);
        let encrypted = self.cipher.encrypt(tenant, original)?;

        let mapping = PseudonymMapping {
            tenant_id: tenant.clone(),
            original_hash: hash.clone(),
            pseudonym: token.clone(),
            pii_kind: kind,
            encrypted_original: encrypted,
            created_at: Utc::now(),
        };

        let inserted = self
            .store
            .insert_if_absent(&mapping)
            .await
            .map_err(|e| SignalveilError::Vault(format!("Mapping insert failed: {e}")))?;

        if inserted {
            tracing::debug!(
                tenant = %tenant,
                kind = %kind,
                "Created pseudonym mapping"
            );
            return Ok(token);
        }

        // Lost the creation race; the first writer's row is authoritative.
        match self
            .store
            .find(tenant, &hash)
            .await
            .map_err(|e| SignalveilError::Vault(format!("Mapping re-read failed: {e}")))?
        {
            Some(existing) => Ok(existing.pseudonym),
            None => Err(SignalveilError::Vault(
                "Mapping disappeared after insert conflict".to_string(),
            )),
        }
    }

    /// Look up a mapping by its content address
    pub async fn lookup(
        &self,
        tenant: &TenantId,
        original_hash: &str,
    ) -> Result<Option<PseudonymMapping>> {
        self.store
            .find(tenant, original_hash)
            .await
            .map_err(|e| SignalveilError::Vault(format!("Mapping lookup failed: {e}")))
    }

    /// Delete a mapping (erasure-request primitive); returns whether a row
    /// existed
    pub async fn delete(&self, tenant: &TenantId, original_hash: &str) -> Result<bool> {
        let removed = self
            .store
            .delete(tenant, original_hash)
            .await
            .map_err(|e| SignalveilError::Vault(format!("Mapping delete failed: {e}")))?;
        if removed {
            tracing::info!(tenant = %tenant, "Deleted pseudonym mapping");
        }
        Ok(removed)
    }

    /// Recover the original value from a mapping's escrow ciphertext
    pub fn decrypt_original(&self, mapping: &PseudonymMapping) -> Result<String> {
        self.cipher
            .decrypt(&mapping.tenant_id, &mapping.encrypted_original)
    }
}

#[cfg(test)]
mod tests {
    use super::escrow::StaticKeyProvider;
    use super::*;
    use crate::adapters::database::memory::MemoryMappingStore;

    fn vault() -> (PseudonymVault, Arc<MemoryMappingStore>) {
        let store = Arc::new(MemoryMappingStore::new());
        let vault = PseudonymVault::new(store.clone(), Arc::new(StaticKeyProvider::new([1u8; 32])));
        (vault, store)
    }

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (vault, store) = vault();
        let t = tenant("tenant-a");

        let first = vault
            .get_or_create(&t, "max@example.com", PiiKind::Email)
            .await
            .unwrap();
        let second = vault
            .get_or_create(&t, "max@example.com", PiiKind::Email)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_token_tenant_independent_rows_tenant_scoped() {
        let (vault, store) = vault();

        let a = vault
            .get_or_create(&tenant("tenant-a"), "max@example.com", PiiKind::Email)
            .await
            .unwrap();
        let b = vault
            .get_or_create(&tenant("tenant-b"), "max@example.com", PiiKind::Email)
            .await
            .unwrap();

        // Identical token, separate escrow rows
        assert_eq!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_escrow_round_trip_through_vault() {
        let (vault, _) = vault();
        let t = tenant("tenant-a");

        vault
            .get_or_create(&t, "+43 664 1234567", PiiKind::PhoneAt)
            .await
            .unwrap();

        let hash = PseudonymVault::original_hash(&t, "+43 664 1234567");
        let mapping = vault.lookup(&t, &hash).await.unwrap().expect("mapping exists");
        let original = vault.decrypt_original(&mapping).unwrap();
        assert_eq!(original, "+43 664 1234567");
    }

    #[tokio::test]
    async fn test_concurrent_creation_single_row() {
        let (vault, store) = vault();
        let vault = Arc::new(vault);
        let t = tenant("tenant-a");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let vault = vault.clone();
            let t = t.clone();
            handles.push(tokio::spawn(async move {
                vault
                    .get_or_create(&t, "race@example.com", PiiKind::Email)
                    .await
                    .unwrap()
            }));
        }

        let mut tokens = Vec::new();
        for handle in handles {
            tokens.push(handle.await.unwrap());
        }

        tokens.dedup();
        assert_eq!(tokens.len(), 1, "all callers saw the same pseudonym");
        assert_eq!(store.len().await, 1, "only one mapping row exists");
    }

    #[tokio::test]
    async fn test_delete_exposes_erasure_primitive() {
        let (vault, store) = vault();
        let t = tenant("tenant-a");

        vault
            .get_or_create(&t, "gone@example.com", PiiKind::Email)
            .await
            .unwrap();
        let hash = PseudonymVault::original_hash(&t, "gone@example.com");

        assert!(vault.delete(&t, &hash).await.unwrap());
        assert!(!vault.delete(&t, &hash).await.unwrap());
        assert_eq!(store.len().await, 0);
    }

    #[test]
    fn test_original_hash_is_tenant_salted() {
        let a = PseudonymVault::original_hash(&tenant("tenant-a"), "same@example.com");
        let b = PseudonymVault::original_hash(&tenant("tenant-b"), "same@example.com");
        assert_ne!(a, b);
    }
}
