//! HTTP surface: router, shared state, and request handlers.
//!
//! Requests are stateless beyond the connection header each one carries. A
//! fresh gateway is built per request from that connection; the only
//! process-wide objects are the gateway factory (credential-free) and the
//! text generator configuration.

pub mod error;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::Json;
use axum::http::Method;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ai::TextGenerator;
use crate::error::ServiceError;
use crate::github::connection::Connection;
use crate::github::gateway::{GatewayFactory, RepositoryGateway};

use self::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Builds a per-request gateway from each connection.
    pub gateways: Arc<dyn GatewayFactory>,
    /// Streaming text generation seam.
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Creates state from a gateway factory and text generator.
    #[must_use]
    pub fn new(gateways: Arc<dyn GatewayFactory>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            gateways,
            generator,
        }
    }

    /// Builds a gateway configured for this request's connection.
    ///
    /// # Errors
    ///
    /// Returns a mapped [`ApiError`] when the connection cannot be turned
    /// into a gateway.
    pub fn gateway(
        &self,
        connection: &Connection,
    ) -> Result<Arc<dyn RepositoryGateway>, ApiError> {
        self.gateways
            .for_connection(connection)
            .map_err(ApiError::from)
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the application router with CORS and tracing layers applied.
#[must_use]
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/connect", post(handlers::connect::connect))
        .route("/api/files", get(handlers::files::list_files))
        .route("/api/files/content", get(handlers::files::file_content))
        .route("/api/commits", get(handlers::commits::list_commits))
        .route("/api/commits/:sha", get(handlers::commits::commit_detail))
        .route(
            "/api/pull-requests",
            get(handlers::pulls::list_pull_requests),
        )
        .route(
            "/api/pull-requests/:number",
            get(handlers::pulls::pull_request_detail),
        )
        .route("/api/repo-info", get(handlers::repo_info::repo_info))
        .route("/api/analyze/file", post(handlers::analyze::analyze_file))
        .route(
            "/api/analyze/commit",
            post(handlers::analyze::analyze_commit),
        )
        .route(
            "/api/analyze/pr",
            post(handlers::analyze::analyze_pull_request),
        )
        .route("/api/analyze/repo", post(handlers::analyze::analyze_repo))
        .route("/api/chat/stream", post(handlers::chat::chat_stream))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves the router until the process exits.
///
/// # Errors
///
/// Returns [`ServiceError::Configuration`] when the address cannot be
/// bound and [`ServiceError::Network`] when serving fails.
pub async fn serve(bind_addr: &str, state: AppState) -> Result<(), ServiceError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|error| ServiceError::Configuration {
            message: format!("failed to bind {bind_addr}: {error}"),
        })?;

    let local_addr = listener
        .local_addr()
        .map_err(|error| ServiceError::Configuration {
            message: format!("failed to read local address: {error}"),
        })?;
    info!(%local_addr, "listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|error| ServiceError::Network {
            message: format!("server error: {error}"),
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use futures::StreamExt;
    use tower::ServiceExt;

    use super::{AppState, router};
    use crate::ai::provider::MockTextGenerator;
    use crate::error::ServiceError;
    use crate::github::gateway::MockGatewayFactory;
    use crate::github::gateway::MockRepositoryGateway;

    fn state_with(
        factory: MockGatewayFactory,
        generator: MockTextGenerator,
    ) -> AppState {
        AppState::new(Arc::new(factory), Arc::new(generator))
    }

    fn connected_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(
                "x-repo-connection",
                r#"{"owner":"octo","repo":"hello-world"}"#,
            )
            .body(Body::empty())
            .expect("request should build")
    }

    async fn body_string(body: Body) -> String {
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("body should collect");
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = router(state_with(
            MockGatewayFactory::new(),
            MockTextGenerator::new(),
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response.into_body()).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn data_endpoint_without_connection_yields_exact_401_body() {
        let app = router(state_with(
            MockGatewayFactory::new(),
            MockTextGenerator::new(),
        ));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/files")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_string(response.into_body()).await,
            r#"{"error":"No repository connected"}"#
        );
    }

    #[tokio::test]
    async fn streaming_endpoint_relays_generator_chunks() {
        let mut factory = MockGatewayFactory::new();
        factory.expect_for_connection().returning(|_| {
            let mut gateway = MockRepositoryGateway::new();
            gateway.expect_file_content().returning(|_| {
                Ok(crate::github::models::test_support::sample_file_content())
            });
            Ok(Arc::new(gateway))
        });

        let mut generator = MockTextGenerator::new();
        generator.expect_stream_text().returning(|_| {
            Ok(futures::stream::iter(vec![
                Ok("The file ".to_owned()),
                Ok("adds two numbers.".to_owned()),
            ])
            .boxed())
        });

        let app = router(state_with(factory, generator));
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze/file")
            .header(
                "x-repo-connection",
                r#"{"owner":"octo","repo":"hello-world"}"#,
            )
            .header("content-type", "application/json")
            .body(Body::from(r#"{"path":"src/lib.rs"}"#))
            .expect("request should build");

        let response = app.oneshot(request).await.expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(
            body_string(response.into_body()).await,
            "The file adds two numbers."
        );
    }

    #[tokio::test]
    async fn upstream_not_found_maps_to_404_before_streaming() {
        let mut factory = MockGatewayFactory::new();
        factory.expect_for_connection().returning(|_| {
            let mut gateway = MockRepositoryGateway::new();
            gateway.expect_file_content().returning(|_| {
                Err(ServiceError::NotFound {
                    message: "file content failed: Not Found".to_owned(),
                })
            });
            Ok(Arc::new(gateway))
        });

        let app = router(state_with(factory, MockTextGenerator::new()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze/file")
            .header(
                "x-repo-connection",
                r#"{"owner":"octo","repo":"hello-world"}"#,
            )
            .header("content-type", "application/json")
            .body(Body::from(r#"{"path":"does/not/exist"}"#))
            .expect("request should build");

        let response = app.oneshot(request).await.expect("router should respond");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_string(response.into_body()).await;
        assert!(body.to_lowercase().contains("not found"), "body: {body}");
    }

    #[tokio::test]
    async fn connect_rejects_missing_fields_with_400() {
        let app = router(state_with(
            MockGatewayFactory::new(),
            MockTextGenerator::new(),
        ));
        let request = Request::builder()
            .method("POST")
            .uri("/api/connect")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"owner":"octo"}"#))
            .expect("request should build");

        let response = app.oneshot(request).await.expect("router should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_string(response.into_body()).await;
        assert!(
            body.contains("Owner and repo are required"),
            "body: {body}"
        );
    }

    #[tokio::test]
    async fn commits_listing_uses_connected_gateway() {
        let mut factory = MockGatewayFactory::new();
        factory.expect_for_connection().returning(|_| {
            let mut gateway = MockRepositoryGateway::new();
            gateway.expect_list_commits().returning(|_| {
                Ok(vec![crate::github::models::test_support::commit_summary(1)])
            });
            Ok(Arc::new(gateway))
        });

        let app = router(state_with(factory, MockTextGenerator::new()));
        let response = app
            .oneshot(connected_request("/api/commits"))
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response.into_body()).await;
        assert!(body.contains("sha00001"), "body: {body}");
    }
}
