//! HTTP contract tests for the external analyzer client
//!
//! The analyzer only ever receives anonymized text and must turn every
//! transport or parse failure into an `Analysis` error the orchestrator
//! can recover from.

use mockito::Server;
use signalveil::adapters::analyzer::HttpAnalyzer;
use signalveil::config::{AnalyzerConfig, Locale};
use signalveil::core::analysis::AnalysisProvider;
use signalveil::domain::{Category, SignalveilError, Urgency};

fn config_for(base_url: &str) -> AnalyzerConfig {
    AnalyzerConfig {
        base_url: base_url.to_string(),
        model: "qwen2.5:3b".to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
    }
}

fn analyzer_for(base_url: &str) -> HttpAnalyzer {
    HttpAnalyzer::new(&config_for(base_url), Locale::DeAt).unwrap()
}

#[tokio::test]
async fn test_successful_analysis_parsed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"response": "{\"category\": \"complaint\", \"urgency\": \"high\", \"sentiment\": -0.7, \"summary\": \"Lieferung fehlt seit Tagen\"}"}"#,
        )
        .create_async()
        .await;

    let result = analyzer_for(&server.url())
        .analyze("Die Lieferung an [alpine-marmot@example.local] fehlt")
        .await
        .unwrap();

    assert_eq!(result.category, Category::Complaint);
    assert_eq!(result.urgency, Urgency::High);
    assert_eq!(result.sentiment, -0.7);
    assert_eq!(result.summary, "Lieferung fehlt seit Tagen");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sentiment_label_normalized_to_float() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(
            r#"{"response": "{\"category\": \"praise\", \"urgency\": \"low\", \"sentiment\": \"very_positive\", \"summary\": \"top\"}"}"#,
        )
        .create_async()
        .await;

    let result = analyzer_for(&server.url()).analyze("alles super").await.unwrap();
    assert_eq!(result.sentiment, 0.9);
}

#[tokio::test]
async fn test_json_extracted_from_model_prose() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(
            r#"{"response": "Here is my analysis:\n{\"category\": \"question\", \"urgency\": \"medium\", \"sentiment\": 0, \"summary\": \"ok\"}\nLet me know!"}"#,
        )
        .create_async()
        .await;

    let result = analyzer_for(&server.url()).analyze("frage").await.unwrap();
    assert_eq!(result.category, Category::Question);
}

#[tokio::test]
async fn test_out_of_vocabulary_values_degrade_leniently() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(
            r#"{"response": "{\"category\": \"rant\", \"urgency\": \"mega\", \"sentiment\": \"furious\", \"summary\": \"?\"}"}"#,
        )
        .create_async()
        .await;

    let result = analyzer_for(&server.url()).analyze("text").await.unwrap();
    assert_eq!(result.category, Category::Unknown);
    assert_eq!(result.urgency, Urgency::Medium);
    assert_eq!(result.sentiment, 0.0);
}

#[tokio::test]
async fn test_error_status_is_analysis_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = analyzer_for(&server.url()).analyze("text").await.unwrap_err();
    assert!(matches!(err, SignalveilError::Analysis(_)));
}

#[tokio::test]
async fn test_response_without_json_is_analysis_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(r#"{"response": "I cannot classify this feedback."}"#)
        .create_async()
        .await;

    let err = analyzer_for(&server.url()).analyze("text").await.unwrap_err();
    assert!(matches!(err, SignalveilError::Analysis(_)));
}

#[tokio::test]
async fn test_non_json_body_is_analysis_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body("<html>proxy error</html>")
        .create_async()
        .await;

    let err = analyzer_for(&server.url()).analyze("text").await.unwrap_err();
    assert!(matches!(err, SignalveilError::Analysis(_)));
}

#[tokio::test]
async fn test_unreachable_analyzer_is_analysis_error() {
    // Nothing listens on this port
    let err = analyzer_for("http://127.0.0.1:1")
        .analyze("text")
        .await
        .unwrap_err();
    assert!(matches!(err, SignalveilError::Analysis(_)));
    assert!(!err.is_retryable(), "recovered via fallback, not retried");
}

#[tokio::test]
async fn test_request_carries_model_and_prompt() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "qwen2.5:3b",
            "stream": false,
        })))
        .with_status(200)
        .with_body(
            r#"{"response": "{\"category\": \"suggestion\", \"urgency\": \"low\", \"sentiment\": 0.1, \"summary\": \"s\"}"}"#,
        )
        .create_async()
        .await;

    analyzer_for(&server.url()).analyze("text").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_health_check_against_tags_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(r#"{"models": []}"#)
        .create_async()
        .await;

    analyzer_for(&server.url()).health_check().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_health_check_failure_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/tags")
        .with_status(503)
        .create_async()
        .await;

    assert!(analyzer_for(&server.url()).health_check().await.is_err());
}
