//! Shared harness for integration tests: a live router wired to wiremock
//! GitHub and model upstreams.

use std::sync::Arc;
use std::time::Duration;

use repolens::github::GatewayTimeouts;
use repolens::{AppState, GeneratorConfig, OctocrabGatewayFactory, OpenAiTextGenerator, router};
use wiremock::MockServer;

/// A running service instance with its mock upstreams.
pub struct TestService {
    /// Base URL of the live router.
    pub base_url: String,
    /// Mock GitHub API server.
    pub github: MockServer,
    /// Mock model endpoint server.
    pub llm: MockServer,
}

/// Starts the real router on an ephemeral port against mock upstreams.
pub async fn start_service() -> TestService {
    let github = MockServer::start().await;
    let llm = MockServer::start().await;

    let gateways = Arc::new(OctocrabGatewayFactory::new(
        github.uri(),
        GatewayTimeouts::default(),
    ));
    let generator = Arc::new(OpenAiTextGenerator::new(GeneratorConfig {
        base_url: llm.uri(),
        model: "test-model".to_owned(),
        api_key: Some("test-key".to_owned()),
        timeout: Duration::from_secs(5),
    }));
    let state = AppState::new(gateways, generator);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("listener should expose address");
    tokio::spawn(async move {
        let _ignored = axum::serve(listener, router(state)).await;
    });

    TestService {
        base_url: format!("http://{addr}"),
        github,
        llm,
    }
}

/// The connection header used by most tests.
#[must_use]
pub fn connection_header() -> &'static str {
    r#"{"owner":"octo","repo":"hello-world","token":"ghp_test"}"#
}

/// Builds an SSE chat-completions body streaming the given fragments.
#[must_use]
pub fn sse_body(chunks: &[&str]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str(&format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": chunk } }] })
        ));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
