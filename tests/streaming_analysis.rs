//! Integration tests for the streaming proxy and its client consumer.

mod support;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use repolens::{ApiClient, StreamBuffer};
use support::{connection_header, sse_body, start_service};

const FILE_SOURCE: &str = "pub fn add(a: u32, b: u32) -> u32 { a + b }\n";

async fn mount_file_content(service: &support::TestService) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello-world/contents/src/lib.rs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "lib.rs",
            "path": "src/lib.rs",
            "type": "file",
            "size": FILE_SOURCE.len(),
            "sha": "blob123",
            "html_url": "https://github.com/octo/hello-world/blob/main/src/lib.rs",
            "content": BASE64.encode(FILE_SOURCE),
            "encoding": "base64"
        })))
        .mount(&service.github)
        .await;
}

#[tokio::test]
async fn analyze_file_streams_raw_text_matching_provider_output() {
    let service = start_service().await;
    mount_file_content(&service).await;
    let chunks = ["This file ", "defines an ", "addition helper."];
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&chunks), "text/event-stream"),
        )
        .mount(&service.llm)
        .await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze/file", service.base_url))
        .header("x-repo-connection", connection_header())
        .json(&serde_json::json!({ "path": "src/lib.rs" }))
        .send()
        .await
        .expect("request should send");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("text/plain; charset=utf-8")
    );
    let body = response.text().await.expect("body should read");
    assert_eq!(body, chunks.concat(), "chunks must concatenate losslessly");

    // The prompt sent upstream embeds the fetched facts.
    let requests = service
        .llm
        .received_requests()
        .await
        .expect("requests should be recorded");
    let sent = requests.first().expect("one generation request expected");
    let payload: serde_json::Value =
        serde_json::from_slice(&sent.body).expect("request body should parse");
    let prompt = payload
        .pointer("/messages/0/content")
        .and_then(serde_json::Value::as_str)
        .expect("prompt should be present");
    assert!(prompt.contains("Analyze this file from a GitHub repository"));
    assert!(prompt.contains("File: src/lib.rs"));
    assert!(prompt.contains("pub fn add"));
}

#[tokio::test]
async fn client_consumer_accumulates_stream_into_buffer() {
    let service = start_service().await;
    mount_file_content(&service).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello-world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "hello-world"
        })))
        .mount(&service.github)
        .await;
    let chunks = ["Streaming ", "works."];
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&chunks), "text/event-stream"),
        )
        .mount(&service.llm)
        .await;

    let mut client = ApiClient::new(service.base_url.clone()).expect("client should build");
    client
        .connect("octo", "hello-world", Some("ghp_test"))
        .await
        .expect("connect should succeed");

    let mut buffer = StreamBuffer::new();
    let full_text = client
        .stream_analysis(
            "/api/analyze/file",
            serde_json::json!({ "path": "src/lib.rs" }),
            &mut buffer,
            |_chunk| {},
        )
        .await
        .expect("stream should succeed");

    assert_eq!(full_text, chunks.concat());
    assert_eq!(buffer.content(), chunks.concat());
    assert!(!buffer.is_streaming());
}

#[tokio::test]
async fn analyze_repo_fans_out_fetches_before_streaming() {
    let service = start_service().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello-world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "hello-world",
            "full_name": "octo/hello-world",
            "stargazers_count": 42,
            "forks_count": 7
        })))
        .expect(1)
        .mount(&service.github)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello-world/git/trees/HEAD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tree": [{ "path": "src/lib.rs", "type": "blob", "size": 100, "sha": "b1" }]
        })))
        .expect(1)
        .mount(&service.github)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello-world/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "sha": "abc1234def", "commit": { "message": "initial commit" } }
        ])))
        .expect(1)
        .mount(&service.github)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello-world/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "number": 1, "title": "First", "state": "open" }
        ])))
        .expect(1)
        .mount(&service.github)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["A small Rust library."]), "text/event-stream"),
        )
        .mount(&service.llm)
        .await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze/repo", service.base_url))
        .header("x-repo-connection", connection_header())
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("request should send");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body should read");
    assert_eq!(body, "A small Rust library.");

    let requests = service
        .llm
        .received_requests()
        .await
        .expect("requests should be recorded");
    let payload: serde_json::Value = serde_json::from_slice(
        &requests.first().expect("one generation request expected").body,
    )
    .expect("request body should parse");
    let prompt = payload
        .pointer("/messages/0/content")
        .and_then(serde_json::Value::as_str)
        .expect("prompt should be present");
    assert!(prompt.contains("Analyze this GitHub repository as a whole"));
    assert!(prompt.contains("- src/lib.rs"));
    assert!(prompt.contains("- abc1234 initial commit"));
    assert!(prompt.contains("- #1 First (open)"));
}

#[tokio::test]
async fn chat_stream_gathers_commit_context_and_embeds_history() {
    let service = start_service().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello-world/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "sha": "abc1234def", "commit": { "message": "tighten parser bounds" } }
        ])))
        .expect(1)
        .mount(&service.github)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["The last commit tightens bounds."]), "text/event-stream"),
        )
        .mount(&service.llm)
        .await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/chat/stream", service.base_url))
        .header("x-repo-connection", connection_header())
        .json(&serde_json::json!({
            "message": "What changed in the latest commit?",
            "history": [
                { "role": "user", "content": "Hi" },
                { "role": "assistant", "content": "Hello! Ask me about the repository." }
            ]
        }))
        .send()
        .await
        .expect("request should send");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body should read");
    assert_eq!(body, "The last commit tightens bounds.");

    let requests = service
        .llm
        .received_requests()
        .await
        .expect("requests should be recorded");
    let payload: serde_json::Value = serde_json::from_slice(
        &requests.first().expect("one generation request expected").body,
    )
    .expect("request body should parse");
    let prompt = payload
        .pointer("/messages/0/content")
        .and_then(serde_json::Value::as_str)
        .expect("prompt should be present");
    assert!(prompt.contains("tighten parser bounds"));
    assert!(prompt.contains("**Conversation so far**"));
    assert!(prompt.contains("**User question**: What changed in the latest commit?"));
}

#[tokio::test]
async fn generation_failure_before_streaming_returns_json_error() {
    let service = start_service().await;
    mount_file_content(&service).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "error": "invalid key" })),
        )
        .mount(&service.llm)
        .await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze/file", service.base_url))
        .header("x-repo-connection", connection_header())
        .json(&serde_json::json!({ "path": "src/lib.rs" }))
        .send()
        .await
        .expect("request should send");

    assert_eq!(response.status(), 401);
    let payload: serde_json::Value = response.json().await.expect("body should parse");
    assert!(payload.get("error").is_some(), "errors keep the JSON envelope");
}

#[tokio::test]
async fn analyze_without_selector_yields_400_before_any_fetch() {
    let service = start_service().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/analyze/commit", service.base_url))
        .header("x-repo-connection", connection_header())
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("request should send");

    assert_eq!(response.status(), 400);
    let payload: serde_json::Value = response.json().await.expect("body should parse");
    assert_eq!(
        payload.get("error").and_then(serde_json::Value::as_str),
        Some("sha is required")
    );
    assert!(
        service
            .github
            .received_requests()
            .await
            .expect("requests should be recorded")
            .is_empty(),
        "validation must fail before any upstream call"
    );
}
