//! Content analysis seam
//!
//! The external text-classification service sits behind [`AnalysisProvider`];
//! only anonymized text ever crosses this boundary. When the provider fails,
//! the orchestrator substitutes the deterministic [`fallback`] analysis;
//! classification quality degrades, ingestion does not block.

pub mod fallback;

use crate::domain::{AnalysisResult, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Classifier over already-anonymized text
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Classify anonymized text into category, urgency, sentiment, summary
    ///
    /// # Errors
    ///
    /// Returns an `Analysis` error on timeout, transport failure or a
    /// malformed response; callers recover via the local fallback.
    async fn analyze(&self, anonymized_text: &str) -> Result<AnalysisResult>;
}

/// Normalize an analyzer sentiment field to a float in [-1.0, 1.0]
///
/// Accepts numbers, numeric strings, and the known label vocabulary
/// (English and German). Anything else maps to neutral 0.0.
pub fn normalize_sentiment(value: &Value) -> f64 {
    if let Some(n) = value.as_f64() {
        return n.clamp(-1.0, 1.0);
    }

    if let Some(s) = value.as_str() {
        let s = s.trim().to_lowercase();
        return match s.as_str() {
            "very_positive" | "sehr_positiv" => 0.9,
            "positive" | "positiv" => 0.6,
            "neutral" => 0.0,
            "negative" | "negativ" => -0.6,
            "very_negative" | "sehr_negativ" => -0.9,
            _ => s
                .parse::<f64>()
                .map(|v| v.clamp(-1.0, 1.0))
                .unwrap_or(0.0),
        };
    }

    0.0
}
