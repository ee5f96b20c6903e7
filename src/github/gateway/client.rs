//! Octocrab client construction helpers for gateway implementations.

use std::time::Duration;

use http::Uri;
use octocrab::Octocrab;

use crate::error::ServiceError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Connect and read timeouts applied to every upstream GitHub call.
///
/// The upstream API otherwise has no bound on slow or hung responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayTimeouts {
    /// Timeout for establishing the connection.
    pub connect: Duration,
    /// Timeout for reading the response.
    pub read: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            read: Duration::from_secs(30),
        }
    }
}

/// Builds an Octocrab client for an optional token and API base URL.
///
/// The token is optional because public repositories can be read
/// anonymously, at a far lower rate limit.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidUrl`] when the base URI cannot be parsed
/// or [`ServiceError::Upstream`] when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: Option<&PersonalAccessToken>,
    api_base: &str,
    timeouts: GatewayTimeouts,
) -> Result<Octocrab, ServiceError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| ServiceError::InvalidUrl(error.to_string()))?;

    let mut builder = Octocrab::builder();
    if let Some(token_value) = token {
        builder = builder.personal_token(token_value.value());
    }

    builder
        .base_uri(base_uri)
        .map_err(|error| ServiceError::Upstream {
            message: format!("build client failed: {error}"),
        })?
        .set_connect_timeout(Some(timeouts.connect))
        .set_read_timeout(Some(timeouts.read))
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
