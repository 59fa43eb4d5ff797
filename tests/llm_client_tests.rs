//! OpenAI-compatible chat completions client against a mock server

use mockito::{Matcher, Server};
use profile_scraper::{CompletionRequest, LanguageModel, LlmError, OpenAiClient, ScraperConfig};
use serde_json::json;

fn client_for(server: &Server) -> OpenAiClient {
    let config = ScraperConfig::builder()
        .llm_api_key("test-key")
        .llm_base_url(server.url())
        .build()
        .unwrap();
    OpenAiClient::new(config.llm()).unwrap()
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_complete_sends_system_user_and_temperature() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "messages": [
                {"role": "system", "content": "Extract fields"},
                {"role": "user", "content": "Jane Doe"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(r#"{"Full Name": "Jane Doe"}"#))
        .create_async()
        .await;

    let client = client_for(&server);
    let request = CompletionRequest::new("gpt-4o-mini", "Jane Doe")
        .with_system("Extract fields")
        .with_temperature(0.0);
    let content = client.complete(&request).await.unwrap();

    assert_eq!(content, r#"{"Full Name": "Jane Doe"}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_without_system_or_temperature() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "user", "content": "Convert the following into valid JSON only:\nx"}
            ]
        })))
        .with_status(200)
        .with_body(completion_body("{}"))
        .create_async()
        .await;

    let client = client_for(&server);
    let request = CompletionRequest::new(
        "gpt-4o-mini",
        "Convert the following into valid JSON only:\nx",
    );
    client.complete(&request).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .complete(&CompletionRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();

    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_raw() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .complete(&CompletionRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Api { status: 502, ref message } if message == "Bad Gateway"));
}

#[tokio::test]
async fn test_empty_content_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion_body("   "))
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .complete(&CompletionRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::EmptyContent));
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .complete(&CompletionRequest::new("gpt-4o-mini", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Parse(_)));
}

#[test]
fn test_endpoint_is_derived_from_base_url() {
    let config = ScraperConfig::builder()
        .llm_api_key("k")
        .llm_base_url("http://localhost:11434/v1/")
        .build()
        .unwrap();

    let client = OpenAiClient::new(config.llm()).unwrap();

    assert_eq!(client.endpoint(), "http://localhost:11434/v1/chat/completions");
}
