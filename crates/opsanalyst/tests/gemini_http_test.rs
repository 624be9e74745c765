//! HTTP-level tests for the Gemini provider against a local mock server.
//!
//! The provider uses a blocking client, so each call runs on a blocking
//! task inside the test runtime.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsanalyst::{AnalystConfig, AnalystError, GeminiProvider, LlmProvider, ModelId};

const MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

async fn generate(server: &MockServer, prompt: &str) -> opsanalyst::Result<String> {
    let base_url = server.uri();
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        let config = AnalystConfig::default()
            .with_api_key("test-key")
            .with_base_url(base_url);
        let provider = GeminiProvider::from_config(&config)?;
        provider.generate(&prompt, &ModelId::parse(MODEL)?)
    })
    .await
    .expect("blocking task panicked")
}

fn error_body(code: u16, message: &str, status: &str) -> serde_json::Value {
    json!({ "error": { "code": code, "message": message, "status": status } })
}

// =============================================================================
// Success
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "Analyze this" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "## Analysis Overview\n" }, { "text": "- Costs are high" }]
                },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = generate(&server, "Analyze this").await.expect("generation");
    assert_eq!(text, "## Analysis Overview\n- Costs are high");
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_key_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "API key not valid. Please pass a valid API key.",
            "INVALID_ARGUMENT",
        )))
        .mount(&server)
        .await;

    let err = generate(&server, "x").await.unwrap_err();
    assert!(matches!(err, AnalystError::Authentication(_)));
    assert!(!err.user_message().contains("API key not valid"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_model_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "models/gemini-2.5-flash is not found for API version v1beta",
            "NOT_FOUND",
        )))
        .mount(&server)
        .await;

    let err = generate(&server, "x").await.unwrap_err();
    match err {
        AnalystError::ModelUnavailable { model, .. } => assert_eq!(model, MODEL),
        other => panic!("Expected ModelUnavailable, got: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_remote_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = generate(&server, "x").await.unwrap_err();
    assert!(matches!(err, AnalystError::RemoteService { status: Some(503), .. }));
    assert_eq!(err.user_message(), "Analysis failed. Please try again later.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocked_prompt_is_remote_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
        )
        .mount(&server)
        .await;

    let err = generate(&server, "x").await.unwrap_err();
    match err {
        AnalystError::RemoteService { message, .. } => assert!(message.contains("SAFETY")),
        other => panic!("Expected RemoteService, got: {other:?}"),
    }
}
