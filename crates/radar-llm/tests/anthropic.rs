//! Integration tests for `AnthropicClient` using wiremock HTTP mocks.

use radar_llm::{AnthropicClient, PerceptionProvider, ProviderError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> AnthropicClient {
    AnthropicClient::with_base_url("test-key", "claude-3-5-sonnet-20241022", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn judge_extracts_json_from_prose_reply() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": "msg_123",
        "content": [
            {
                "type": "text",
                "text": "Here is the analysis you asked for:\n\n{\"sentiment\": 0.3, \"trust_score\": 7}\n\nLet me know if you need more detail."
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(serde_json::json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1024
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let value = client.judge("prompt").await.expect("should parse reply");

    assert_eq!(value["sentiment"], 0.3);
    assert_eq!(value["trust_score"], 7);
    assert!(value.get("raw_response").is_none());
}

#[tokio::test]
async fn judge_falls_open_to_raw_response_without_json() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "content": [
            { "type": "text", "text": "I can only offer a qualitative view of this brand." }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let value = client.judge("prompt").await.expect("raw text is a success");

    assert_eq!(
        value["raw_response"],
        "I can only offer a qualitative view of this brand."
    );
}

#[tokio::test]
async fn judge_fails_closed_on_invalid_json_block() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "content": [
            { "type": "text", "text": "Scores: {sentiment: high, trust: strong}" }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.judge("prompt").await;

    assert!(matches!(result, Err(ProviderError::Parse)));
}

#[tokio::test]
async fn judge_surfaces_api_error_message() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "type": "error",
        "error": { "type": "authentication_error", "message": "invalid x-api-key" }
    });

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.judge("prompt").await;

    match result {
        Err(ProviderError::Api(msg)) => assert_eq!(msg, "invalid x-api-key"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}
