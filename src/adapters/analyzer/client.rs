//! HTTP client for the external analyzer service
//!
//! Posts only anonymized text to an Ollama-style generate endpoint, bounded
//! by explicit timeouts. Transport failures, non-success statuses and
//! unparseable responses surface as `Analysis` errors; the orchestrator
//! recovers with the local fallback, so this client never retries.

use crate::config::{AnalyzerConfig, Locale};
use crate::core::analysis::{normalize_sentiment, AnalysisProvider};
use crate::domain::{AnalysisResult, Category, Result, SignalveilError, Urgency};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP analyzer over an LLM generate endpoint
pub struct HttpAnalyzer {
    base_url: String,
    model: String,
    locale: Locale,
    client: Client,
}

impl HttpAnalyzer {
    /// Build the client with the configured timeouts
    pub fn new(config: &AnalyzerConfig, locale: Locale) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| {
                SignalveilError::Analysis(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            locale,
            client,
        })
    }

    /// Probe the analyzer service
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SignalveilError::Analysis(format!("Analyzer unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(SignalveilError::Analysis(format!(
                "Analyzer health check returned status {}",
                response.status()
            )));
        }

        tracing::info!(base_url = %self.base_url, "Analyzer health check passed");
        Ok(())
    }

    fn build_prompt(&self, anonymized_text: &str) -> String {
        match self.locale {
            Locale::DeAt => format!(
                "Analysiere dieses Kunden-Feedback und antworte NUR mit validem JSON.\n\n\
                 Feedback:\n{anonymized_text}\n\n\
                 Antworte AUSSCHLIESSLICH mit diesem JSON-Format (keine weiteren Texte):\n\
                 {{\n\
                 \x20 \"category\": \"complaint|request|question|praise|suggestion\",\n\
                 \x20 \"urgency\": \"low|medium|high|critical\",\n\
                 \x20 \"sentiment\": <Zahl zwischen -1.0 (sehr negativ) und +1.0 (sehr positiv)>,\n\
                 \x20 \"summary\": \"<Zusammenfassung in max. 40 Wörtern>\"\n\
                 }}"
            ),
            Locale::En => format!(
                "Analyze this customer feedback and respond ONLY with valid JSON.\n\n\
                 Feedback:\n{anonymized_text}\n\n\
                 Respond EXCLUSIVELY with this JSON format (no additional text):\n\
                 {{\n\
                 \x20 \"category\": \"complaint|request|question|praise|suggestion\",\n\
                 \x20 \"urgency\": \"low|medium|high|critical\",\n\
                 \x20 \"sentiment\": <number between -1.0 (very negative) and +1.0 (very positive)>,\n\
                 \x20 \"summary\": \"<summary in at most 40 words>\"\n\
                 }}"
            ),
        }
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalyzer {
    async fn analyze(&self, anonymized_text: &str) -> Result<AnalysisResult> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "model": self.model,
                "prompt": self.build_prompt(anonymized_text),
                "stream": false,
                "options": { "temperature": 0.05, "top_p": 0.9 },
            }))
            .send()
            .await
            .map_err(|e| SignalveilError::Analysis(format!("Analyzer request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SignalveilError::Analysis(format!(
                "Analyzer returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SignalveilError::Analysis(format!("Invalid analyzer response: {e}")))?;

        let raw = body
            .get("response")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        tracing::debug!(chars = raw.len(), "Analyzer raw response received");

        parse_analysis_response(raw)
    }
}

/// Extract and normalize the first JSON object in a raw model response
pub(crate) fn parse_analysis_response(raw: &str) -> Result<AnalysisResult> {
    let start = raw.find('{');
    let end = raw.rfind('}');

    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if e > s => (s, e),
        _ => {
            return Err(SignalveilError::Analysis(
                "No JSON object in analyzer response".to_string(),
            ))
        }
    };

    let data: Value = serde_json::from_str(&raw[start..=end])
        .map_err(|e| SignalveilError::Analysis(format!("Malformed analyzer JSON: {e}")))?;

    Ok(AnalysisResult {
        category: Category::parse_lenient(data.get("category").and_then(|v| v.as_str()).unwrap_or("unknown")),
        urgency: Urgency::parse_lenient(data.get("urgency").and_then(|v| v.as_str()).unwrap_or("medium")),
        sentiment: normalize_sentiment(data.get("sentiment").unwrap_or(&Value::Null)),
        summary: data
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
    })
}
