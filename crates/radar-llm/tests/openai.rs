//! Integration tests for `OpenAiClient` using wiremock HTTP mocks.

use radar_llm::{OpenAiClient, PerceptionProvider, ProviderError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OpenAiClient {
    OpenAiClient::with_base_url("test-key", "gpt-4-turbo-preview", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn judge_parses_json_mode_reply() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": "chatcmpl-123",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "{\"sentiment\":0.5,\"attributes\":[\"reliable\"],\"positioning\":\"premium\",\"innovation_score\":8,\"trust_score\":7,\"sustainability_score\":6,\"value_score\":9}"
                },
                "finish_reason": "stop"
            }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4-turbo-preview",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let value = client
        .judge("prompt")
        .await
        .expect("should parse judgement");

    assert_eq!(value["sentiment"], 0.5);
    assert_eq!(value["innovation_score"], 8);
    assert_eq!(value["value_score"], 9);
}

#[tokio::test]
async fn judge_fails_closed_on_non_json_content() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "not json at all" } }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.judge("prompt").await;

    assert!(matches!(result, Err(ProviderError::Parse)));
}

#[tokio::test]
async fn judge_fails_closed_on_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
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
        "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.judge("prompt").await;

    match result {
        Err(ProviderError::Api(msg)) => assert_eq!(msg, "Incorrect API key provided"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}
