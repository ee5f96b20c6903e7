//! Request extractors for the HTTP surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::github::connection::{CONNECTION_HEADER, Connection};

use super::error::ApiError;

/// Extracts the repository connection from the `x-repo-connection` header.
///
/// Rejects with `401 {"error": "No repository connected"}` when the header
/// is absent or carries a browser session-storage sentinel value.
#[derive(Debug, Clone)]
pub struct RepoConnection(pub Connection);

#[axum::async_trait]
impl<S> FromRequestParts<S> for RepoConnection
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CONNECTION_HEADER)
            .and_then(|header| header.to_str().ok());
        Connection::from_header_value(value)
            .map(Self)
            .map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRequestParts;
    use axum::http::{Request, StatusCode};

    use super::RepoConnection;

    async fn extract(header: Option<&str>) -> Result<RepoConnection, super::ApiError> {
        let mut builder = Request::builder().uri("/api/files");
        if let Some(value) = header {
            builder = builder.header("x-repo-connection", value);
        }
        let request = builder.body(()).expect("request should build");
        let (mut parts, ()) = request.into_parts();
        RepoConnection::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_header_rejects_with_regression_literal() {
        let error = extract(None).await.expect_err("missing header should fail");
        assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error.message(), "No repository connected");
    }

    #[tokio::test]
    async fn sentinel_header_rejects_like_missing() {
        let error = extract(Some("undefined"))
            .await
            .expect_err("sentinel header should fail");
        assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_header_yields_connection() {
        let connection = extract(Some(r#"{"owner":"octo","repo":"hello-world"}"#))
            .await
            .expect("header should parse");
        assert_eq!(connection.0.owner, "octo");
        assert_eq!(connection.0.repo, "hello-world");
    }
}
