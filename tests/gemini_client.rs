// tests/gemini_client.rs
//
// Drives the real Gemini client against a local axum server that mimics
// `models/{model}:generateContent`.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use worksheet_backend::gemini::Gemini;
use worksheet_backend::llm::{LlmError, TextGenerator};

async fn fake_generate(Path(call): Path<String>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let key = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()).unwrap_or_default();
    if key != "good-key" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}})),
        );
    }
    if call != "gemini-test:generateContent" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": {"message": format!("unknown call {}", call)}})));
    }

    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    if prompt == "silence" {
        return (StatusCode::OK, Json(json!({"candidates": [], "usageMetadata": {"promptTokenCount": 1}})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "echo: "}, {"text": prompt}]}}],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 5, "totalTokenCount": 8}
        })),
    )
}

async fn spawn_fake() -> SocketAddr {
    let app = Router::new().route("/v1beta/models/:call", post(fake_generate));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, key: &str) -> Gemini {
    Gemini::new(key.into(), format!("http://{}/v1beta", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn returns_concatenated_candidate_text() {
    let addr = spawn_fake().await;
    let text = client(addr, "good-key").generate("gemini-test", "こんにちは").await.unwrap();
    assert_eq!(text, "echo: こんにちは");
}

#[tokio::test]
async fn http_errors_carry_the_api_message() {
    let addr = spawn_fake().await;
    let err = client(addr, "").generate("gemini-test", "hi").await.unwrap_err();
    match err {
        LlmError::Http { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn no_candidates_is_an_empty_response() {
    let addr = spawn_fake().await;
    let err = client(addr, "good-key").generate("gemini-test", "silence").await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let err = client(addr, "good-key").generate("gemini-test", "hi").await.unwrap_err();
    assert!(matches!(err, LlmError::Transport(_)));
}
