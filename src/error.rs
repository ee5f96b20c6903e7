//! Error types shared across the gateway, AI, and HTTP layers.

use thiserror::Error;

use crate::github::rate_limit::RateLimitInfo;

/// Errors surfaced while validating requests, talking to GitHub, or
/// streaming model output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// A required request field was missing or malformed.
    #[error("{message}")]
    Validation {
        /// Field-specific description of the missing or invalid input.
        message: String,
    },

    /// No repository connection header was supplied.
    #[error("No repository connected")]
    MissingConnection,

    /// The repository connection header could not be parsed.
    #[error("repository connection is invalid: {message}")]
    InvalidConnection {
        /// Detail describing why the connection header was rejected.
        message: String,
    },

    /// The authentication token was required but missing.
    #[error("GitHub token is required. Get a token at https://github.com/settings/tokens")]
    MissingToken,

    /// GitHub rejected the supplied credentials.
    #[error("GitHub rejected the credentials: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The repository or resource does not exist upstream.
    #[error("GitHub resource not found: {message}")]
    NotFound {
        /// Description of the missing repository or path.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with rate limit markers.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available from the rate-limit endpoint.
        rate_limit: Option<RateLimitInfo>,
        /// Error message with guidance on supplying a token.
        message: String,
    },

    /// An upstream service returned a non-2xx response outside the cases above.
    #[error("upstream error: {message}")]
    Upstream {
        /// Response detail from the upstream service.
        message: String,
    },

    /// Networking failed while calling an upstream service.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The generation stream failed after it had been opened.
    #[error("stream error: {message}")]
    Stream {
        /// Detail from the failed stream read or decode.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// A listing limit was outside the accepted range.
    #[error("invalid limit: {message}")]
    InvalidLimit {
        /// Description of the rejected limit value.
        message: String,
    },
}

impl ServiceError {
    /// Builds a validation error for a missing request field.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            message: format!("{field} is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;

    #[test]
    fn missing_connection_display_matches_wire_literal() {
        assert_eq!(
            ServiceError::MissingConnection.to_string(),
            "No repository connected"
        );
    }

    #[test]
    fn not_found_display_mentions_not_found() {
        let error = ServiceError::NotFound {
            message: "repos/owner/repo/contents/does/not/exist".to_owned(),
        };
        assert!(error.to_string().to_lowercase().contains("not found"));
    }

    #[test]
    fn missing_field_names_the_field() {
        let error = ServiceError::missing_field("path");
        assert_eq!(error.to_string(), "path is required");
    }
}
