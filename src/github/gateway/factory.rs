//! Per-request gateway construction.
//!
//! The factory is the only process-wide object in the GitHub layer and
//! holds no credentials. Each request's connection is turned into a fresh,
//! fully configured gateway, so one connection's token can never be reused
//! by another request.

use std::sync::Arc;

use crate::error::ServiceError;
use crate::github::connection::Connection;

use super::RepositoryGateway;
use super::client::{GatewayTimeouts, build_octocrab_client};
use super::repository::OctocrabRepositoryGateway;

/// Builds repository gateways for incoming connections.
#[cfg_attr(test, mockall::automock)]
pub trait GatewayFactory: Send + Sync {
    /// Builds a gateway configured with exactly this connection's
    /// credentials and repository identity.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the connection's owner or
    /// repo is blank, [`ServiceError::MissingToken`] when a stored token is
    /// blank, or [`ServiceError::InvalidUrl`] when the API base cannot be
    /// parsed.
    fn for_connection(
        &self,
        connection: &Connection,
    ) -> Result<Arc<dyn RepositoryGateway>, ServiceError>;
}

/// Octocrab-backed factory configured with the service's API base and
/// timeouts.
#[derive(Debug, Clone)]
pub struct OctocrabGatewayFactory {
    api_base: String,
    timeouts: GatewayTimeouts,
}

impl OctocrabGatewayFactory {
    /// Creates a factory targeting the given GitHub API base URL.
    #[must_use]
    pub const fn new(api_base: String, timeouts: GatewayTimeouts) -> Self {
        Self { api_base, timeouts }
    }

    /// Creates a factory targeting the public GitHub API.
    #[must_use]
    pub fn public_github() -> Self {
        Self::new("https://api.github.com".to_owned(), GatewayTimeouts::default())
    }
}

impl GatewayFactory for OctocrabGatewayFactory {
    fn for_connection(
        &self,
        connection: &Connection,
    ) -> Result<Arc<dyn RepositoryGateway>, ServiceError> {
        let locator = connection.locator(&self.api_base)?;
        let token = connection.token()?;
        let client = build_octocrab_client(token.as_ref(), &self.api_base, self.timeouts)?;
        Ok(Arc::new(OctocrabRepositoryGateway::new(client, locator)))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{GatewayFactory, OctocrabGatewayFactory};
    use crate::github::connection::Connection;
    use crate::github::gateway::GatewayTimeouts;

    fn repo_body() -> serde_json::Value {
        serde_json::json!({ "name": "hello-world", "full_name": "octo/hello-world" })
    }

    #[tokio::test]
    async fn sequential_connections_use_their_own_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello-world"))
            .and(header("authorization", "Bearer token-alpha"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello-world"))
            .and(header("authorization", "Bearer token-beta"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
            .expect(1)
            .mount(&server)
            .await;

        let factory = OctocrabGatewayFactory::new(server.uri(), GatewayTimeouts::default());

        let first = Connection::new("octo", "hello-world", Some("token-alpha"))
            .expect("connection should build");
        factory
            .for_connection(&first)
            .expect("gateway should build")
            .repo_info()
            .await
            .expect("first request should succeed");

        let second = Connection::new("octo", "hello-world", Some("token-beta"))
            .expect("connection should build");
        factory
            .for_connection(&second)
            .expect("gateway should build")
            .repo_info()
            .await
            .expect("second request should succeed");

        // MockServer::expect(1) on each mock asserts neither token was
        // reused across requests when the server verifies on drop.
    }

    #[tokio::test]
    async fn anonymous_connections_send_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello-world"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_body()))
            .mount(&server)
            .await;

        let factory = OctocrabGatewayFactory::new(server.uri(), GatewayTimeouts::default());
        let connection =
            Connection::new("octo", "hello-world", None).expect("connection should build");
        factory
            .for_connection(&connection)
            .expect("gateway should build")
            .repo_info()
            .await
            .expect("request should succeed");

        let requests = server
            .received_requests()
            .await
            .expect("requests should be recorded");
        assert!(
            requests
                .iter()
                .all(|request| !request.headers.contains_key("authorization")),
            "anonymous request must not carry credentials"
        );
    }
}
