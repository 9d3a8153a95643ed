//! Ingestion orchestrator
//!
//! Sequences one feedback item through
//! `RECEIVED → DETECTED → ANONYMIZED → ANALYZED → PERSISTED → AUDITED → DONE`,
//! strictly sequential with no internal retries. Raw content and detections
//! never cross the analysis boundary: the external analyzer only ever sees
//! anonymized text. Any failure before the signal row is persisted is fatal
//! for the request; the audit step is best-effort.

use crate::adapters::database::SignalStore;
use crate::core::analysis::fallback::fallback_analysis;
use crate::core::analysis::AnalysisProvider;
use crate::core::anonymizer::Anonymizer;
use crate::core::audit::{AuditLedger, AuditOutcome};
use crate::core::detector::Detector;
use crate::config::Locale;
use crate::domain::{
    AuditAction, IngestOutcome, IngestRequest, Result, Signal, SignalId, SignalveilError,
};
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

const PREVIEW_MAX_CHARS: usize = 200;

/// End-to-end ingestion pipeline for one tenant-scoped feedback item
pub struct IngestPipeline {
    detector: Detector,
    anonymizer: Anonymizer,
    analyzer: Arc<dyn AnalysisProvider>,
    signals: Arc<dyn SignalStore>,
    ledger: AuditLedger,
    locale: Locale,
}

impl IngestPipeline {
    pub fn new(
        detector: Detector,
        anonymizer: Anonymizer,
        analyzer: Arc<dyn AnalysisProvider>,
        signals: Arc<dyn SignalStore>,
        ledger: AuditLedger,
        locale: Locale,
    ) -> Self {
        Self {
            detector,
            anonymizer,
            analyzer,
            signals,
            ledger,
            locale,
        }
    }

    /// Process one feedback item through the full pipeline
    ///
    /// # Errors
    ///
    /// Returns `Vault` or `Persistence` errors when pseudonym assignment or
    /// the signal insert fail; analyzer and ledger failures are absorbed.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome> {
        let signal_id = SignalId::generate();
        tracing::info!(
            tenant = %request.tenant_id,
            signal = %signal_id,
            source = %request.source,
            "Processing feedback"
        );

        // RECEIVED -> DETECTED
        let detections = self.detector.detect(&request.content);
        tracing::info!(
            signal = %signal_id,
            pii_detected = detections.len(),
            "Detection complete"
        );

        // DETECTED -> ANONYMIZED
        let anonymized = self
            .anonymizer
            .anonymize(&request.content, &detections, &request.tenant_id)
            .await?;

        // ANONYMIZED -> ANALYZED; only anonymized text crosses this boundary
        let analysis = match self.analyzer.analyze(&anonymized.anonymized_text).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    signal = %signal_id,
                    error = %e,
                    "External analysis unavailable, using local fallback"
                );
                fallback_analysis(&anonymized.anonymized_text, self.locale)
            }
        };
        tracing::info!(
            signal = %signal_id,
            category = %analysis.category,
            urgency = %analysis.urgency,
            "Analysis complete"
        );

        // ANALYZED -> PERSISTED
        let now = Utc::now();
        let signal = Signal {
            tenant_id: request.tenant_id.clone(),
            signal_id: signal_id.clone(),
            category: analysis.category,
            urgency: analysis.urgency,
            sentiment: analysis.sentiment,
            anonymized_content: anonymized.anonymized_text.clone(),
            metadata: Some(json!({
                "source": request.source,
                "pii_count": detections.len(),
                "original_metadata": request.metadata,
                "summary": analysis.summary,
            })),
            created_at: now,
            updated_at: now,
        };

        self.signals.insert(&signal).await.map_err(|e| {
            SignalveilError::Persistence(format!("Failed to store signal {signal_id}: {e}"))
        })?;
        tracing::info!(signal = %signal_id, "Signal stored");

        // PERSISTED -> AUDITED; the outcome feeds observability only and
        // never reverts the persisted signal
        let pii_kinds: BTreeSet<&'static str> = detections.iter().map(|d| d.kind.label()).collect();
        let outcome = self
            .ledger
            .record(
                &request.tenant_id,
                AuditAction::Ingest,
                Some(&signal_id),
                None,
                Some(json!({
                    "source": request.source,
                    "pii_detected": detections.len(),
                    "pii_kinds": pii_kinds,
                    "category": analysis.category,
                    "urgency": analysis.urgency,
                })),
            )
            .await;
        if let AuditOutcome::Dropped { reason } = &outcome {
            tracing::warn!(signal = %signal_id, reason = %reason, "Audit trail entry dropped");
        }

        // DONE
        Ok(IngestOutcome {
            signal_id,
            status: "processed".to_string(),
            pii_detected: detections.len(),
            category: analysis.category,
            urgency: analysis.urgency,
            sentiment: analysis.sentiment,
            anonymized_preview: preview(&anonymized.anonymized_text),
        })
    }
}

/// Truncate anonymized text for the response preview
fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_MAX_CHARS {
        let truncated: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}
