//! PII detection
//!
//! The detector scans raw text against the pattern library and emits a
//! position-ordered, non-overlapping list of typed detections. Candidates
//! are accepted in production order (structural patterns first, then the
//! first-name lookup, then contextual full-name templates) and a later
//! candidate whose span intersects an already-accepted span is rejected
//! outright. This biases toward high-precision structural matches over
//! heuristic name matches; a name embedded in an email address is silently
//! dropped, not merged.

pub mod patterns;

use crate::config::Locale;
use crate::domain::{Detection, PiiKind, Result, SignalveilError};
use patterns::PatternLibrary;
use std::collections::BTreeMap;
use std::sync::Arc;

const FIRST_NAME_CONFIDENCE: f32 = 0.85;
const FULL_NAME_CONFIDENCE: f32 = 0.90;

/// Pattern-based PII detector
pub struct Detector {
    library: Arc<PatternLibrary>,
    locale: Locale,
}

impl Detector {
    /// Create a detector over a compiled library for one locale
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the library has no name rules
    /// for the requested locale.
    pub fn new(library: Arc<PatternLibrary>, locale: Locale) -> Result<Self> {
        if library.rules_for(locale).is_none() {
            return Err(SignalveilError::Configuration(format!(
                "Pattern library defines no name rules for locale '{locale}'"
            )));
        }
        Ok(Self { library, locale })
    }

    /// Detector with the embedded default library
    pub fn with_defaults(locale: Locale) -> Result<Self> {
        Self::new(Arc::new(PatternLibrary::embedded_default()?), locale)
    }

    /// Scan `text` and return accepted detections sorted by start offset
    ///
    /// Pure computation; empty text yields an empty result.
    pub fn detect(&self, text: &str) -> Vec<Detection> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut accepted: Vec<Detection> = Vec::new();

        // 1. Structural patterns, confidence 1.0
        for pattern in self.library.structural() {
            for (start, end) in pattern.find_spans(text) {
                try_accept(&mut accepted, pattern.kind, text, start, end, 1.0);
            }
        }

        if let Some(rules) = self.library.rules_for(self.locale) {
            // 2. First-name lookup over capitalized tokens
            for caps in self.library.word_pattern().captures_iter(text) {
                if let Some(word) = caps.get(1) {
                    if rules.is_first_name(&word.as_str().to_lowercase()) {
                        try_accept(
                            &mut accepted,
                            PiiKind::FirstName,
                            text,
                            word.start(),
                            word.end(),
                            FIRST_NAME_CONFIDENCE,
                        );
                    }
                }
            }

            // 3. Contextual full names, anchored to the captured name span
            for template in rules.context_patterns() {
                for caps in template.captures_iter(text) {
                    if let Some(name) = caps.get(1) {
                        try_accept(
                            &mut accepted,
                            PiiKind::FullName,
                            text,
                            name.start(),
                            name.end(),
                            FULL_NAME_CONFIDENCE,
                        );
                    }
                }
            }
        }

        accepted.sort_by_key(|d| d.start);

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for d in &accepted {
            *counts.entry(d.kind.label()).or_insert(0) += 1;
        }
        tracing::debug!(total = accepted.len(), kinds = ?counts, "PII detection complete");

        accepted
    }
}

/// First-accepted-wins overlap resolution
fn try_accept(
    accepted: &mut Vec<Detection>,
    kind: PiiKind,
    text: &str,
    start: usize,
    end: usize,
    confidence: f32,
) {
    if accepted.iter().any(|d| d.overlaps(start, end)) {
        return;
    }
    accepted.push(Detection {
        kind,
        value: text[start..end].to_string(),
        start,
        end,
        confidence,
    });
}
