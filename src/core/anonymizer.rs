//! Text anonymization
//!
//! Rewrites a text by replacing each detected span with its bracket-wrapped
//! pseudonym. Replacements run in descending start order so earlier spans'
//! offsets stay valid throughout the rewrite. The `[pseudonym]` delimiter
//! format is a stable contract: downstream consumers and fixtures depend
//! on the exact characters.

use crate::core::vault::PseudonymVault;
use crate::domain::{AnonymizationResult, Detection, Result, Substitution, TenantId};
use std::sync::Arc;

/// Span-replacement anonymizer backed by the pseudonym vault
pub struct Anonymizer {
    vault: Arc<PseudonymVault>,
}

impl Anonymizer {
    pub fn new(vault: Arc<PseudonymVault>) -> Self {
        Self { vault }
    }

    /// Replace each detection with its pseudonym
    ///
    /// Empty detections short-circuit without any vault calls. Substitution
    /// records come back in ascending position order; one vault row may be
    /// created per previously-unseen original value.
    ///
    /// # Errors
    ///
    /// Propagates `Vault` errors; without pseudonym assignment no
    /// anonymization is possible.
    pub async fn anonymize(
        &self,
        text: &str,
        detections: &[Detection],
        tenant: &TenantId,
    ) -> Result<AnonymizationResult> {
        if detections.is_empty() {
            return Ok(AnonymizationResult {
                anonymized_text: text.to_string(),
                substitutions: Vec::new(),
            });
        }

        let mut ordered: Vec<&Detection> = detections.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        let mut anonymized = text.to_string();
        let mut substitutions = Vec::with_capacity(ordered.len());

        for detection in ordered {
            let pseudonym = self
                .vault
                .get_or_create(tenant, &detection.value, detection.kind)
                .await?;

            anonymized.replace_range(detection.start..detection.end, &format!("[{pseudonym}]"));
            substitutions.push(Substitution {
                kind: detection.kind,
                pseudonym,
                position: detection.start,
            });
        }

        substitutions.reverse();

        tracing::debug!(
            tenant = %tenant,
            replacements = substitutions.len(),
            "Anonymized content"
        );

        Ok(AnonymizationResult {
            anonymized_text: anonymized,
            substitutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::memory::MemoryMappingStore;
    use crate::core::detector::Detector;
    use crate::core::vault::escrow::StaticKeyProvider;
    use crate::config::Locale;
    use crate::domain::PiiKind;

    fn anonymizer() -> (Anonymizer, Arc<MemoryMappingStore>) {
        let store = Arc::new(MemoryMappingStore::new());
        let vault = Arc::new(PseudonymVault::new(
            store.clone(),
            Arc::new(StaticKeyProvider::new([3u8; 32])),
        ));
        (Anonymizer::new(vault), store)
    }

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_no_vault_calls() {
        let (anonymizer, store) = anonymizer();
        let result = anonymizer
            .anonymize("", &[], &tenant("t1"))
            .await
            .unwrap();

        assert_eq!(result.anonymized_text, "");
        assert!(result.substitutions.is_empty());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_text_without_detections_unchanged() {
        let (anonymizer, store) = anonymizer();
        let result = anonymizer
            .anonymize("nothing personal here", &[], &tenant("t1"))
            .await
            .unwrap();

        assert_eq!(result.anonymized_text, "nothing personal here");
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_single_email_replacement_format() {
        let (anonymizer, _) = anonymizer();
        let text = "Contact me at max.mustermann@example.com now.";
        let detections = Detector::with_defaults(Locale::DeAt)
            .unwrap()
            .detect(text);

        let result = anonymizer
            .anonymize(text, &detections, &tenant("t1"))
            .await
            .unwrap();

        assert_eq!(result.substitutions.len(), 1);
        assert_eq!(result.substitutions[0].kind, PiiKind::Email);

        // "Contact me at [<adjective>-<animal>@example.local] now."
        assert!(result.anonymized_text.starts_with("Contact me at ["));
        assert!(result.anonymized_text.ends_with("] now."));
        assert!(result.anonymized_text.contains("@example.local]"));
        assert!(!result.anonymized_text.contains("max.mustermann"));
    }

    #[tokio::test]
    async fn test_multiple_replacements_keep_offsets_valid() {
        let (anonymizer, _) = anonymizer();
        let text = "Anna erreicht man unter anna@example.com oder 0664 1234567.";
        let detections = Detector::with_defaults(Locale::DeAt)
            .unwrap()
            .detect(text);
        assert!(detections.len() >= 3);

        let result = anonymizer
            .anonymize(text, &detections, &tenant("t1"))
            .await
            .unwrap();

        assert!(!result.anonymized_text.contains("anna@example.com"));
        assert!(!result.anonymized_text.contains("0664"));
        // Surrounding prose survives the rewrite
        assert!(result.anonymized_text.contains("erreicht man unter"));

        // Substitutions ascend by position
        for pair in result.substitutions.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
    }

    #[tokio::test]
    async fn test_repeated_value_reuses_pseudonym() {
        let (anonymizer, store) = anonymizer();
        let text = "max@example.com und nochmal max@example.com";
        let detections = Detector::with_defaults(Locale::DeAt)
            .unwrap()
            .detect(text);
        assert_eq!(detections.len(), 2);

        let result = anonymizer
            .anonymize(text, &detections, &tenant("t1"))
            .await
            .unwrap();

        assert_eq!(
            result.substitutions[0].pseudonym,
            result.substitutions[1].pseudonym
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_identical_token_across_tenants() {
        let (anonymizer, store) = anonymizer();
        let text = "mail: shared@example.com";
        let detections = Detector::with_defaults(Locale::DeAt)
            .unwrap()
            .detect(text);

        let a = anonymizer
            .anonymize(text, &detections, &tenant("tenant-a"))
            .await
            .unwrap();
        let b = anonymizer
            .anonymize(text, &detections, &tenant("tenant-b"))
            .await
            .unwrap();

        // Token generation is tenant-independent; mapping existence is not
        assert_eq!(a.anonymized_text, b.anonymized_text);
        assert_eq!(store.len().await, 2);
    }
}
