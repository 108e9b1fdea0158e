//! HTTP-level tests for the Gemini provider against a local mock server

use csa_domain::traits::LlmProvider;
use csa_llm::{GeminiProvider, LlmError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1/models/gemini-1.5-flash:generateContent";

fn provider_for(server: &MockServer) -> GeminiProvider {
    GeminiProvider::builder("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_generate_returns_trimmed_first_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "extract please"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "  {\"Supplier Name\": \"Acme\"}\n"}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let text = LlmProvider::generate(&provider, "extract please").await.unwrap();

    assert_eq!(text, "{\"Supplier Name\": \"Acme\"}");
}

#[tokio::test]
async fn test_rate_limit_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.generate("prompt").await.unwrap_err();

    match &err {
        LlmError::Api { status, body } => {
            assert_eq!(*status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "Error: 429, rate limited");
}

#[tokio::test]
async fn test_non_200_success_status_is_still_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.generate("prompt").await.unwrap_err();
    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn test_missing_candidate_text_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.generate("prompt").await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let provider = GeminiProvider::builder("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = provider.generate("prompt").await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_communication_error() {
    let provider = GeminiProvider::builder("secret-key")
        .base_url("http://127.0.0.1:1/v1")
        .build()
        .unwrap();

    let err = provider.generate("prompt").await.unwrap_err();
    assert!(matches!(err, LlmError::Communication(_)));
    assert!(!err.to_string().contains("secret-key"));
}
