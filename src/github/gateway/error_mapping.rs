//! Error mapping for the Octocrab gateway implementation.
//!
//! Every upstream failure is classified in exactly one place so the rest of
//! the crate only ever sees the [`ServiceError`] taxonomy.

use http::StatusCode;

use crate::error::ServiceError;

/// Guidance appended to rate-limit errors; an anonymous caller can raise the
/// quota from 60 to 5,000 requests per hour by supplying a token.
pub(super) const RATE_LIMIT_GUIDANCE: &str = "Please provide a GitHub token to increase your \
     rate limit from 60 to 5,000 requests per hour. Create a token at \
     https://github.com/settings/tokens";

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on
/// the HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

/// Maps a GitHub API error response to the service taxonomy.
///
/// Rate-limit classification happens before this function is reached; see
/// the gateway's rate-limit enrichment path.
pub(super) fn map_github_error(operation: &str, source: &octocrab::GitHubError) -> ServiceError {
    match source.status_code {
        StatusCode::NOT_FOUND => ServiceError::NotFound {
            message: format!(
                "{operation} failed: {message}. Check the owner and repository name.",
                message = source.message
            ),
        },
        StatusCode::UNAUTHORIZED => ServiceError::Authentication {
            message: format!(
                "{operation} failed: invalid GitHub token. Please check your token and try again."
            ),
        },
        StatusCode::FORBIDDEN => ServiceError::Authentication {
            message: format!(
                "{operation} failed: access forbidden. Check your token permissions or \
                 repository visibility."
            ),
        },
        status => ServiceError::Upstream {
            message: format!(
                "{operation} failed with status {status}: {message}",
                message = source.message
            ),
        },
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ServiceError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_github_error(operation, source);
    }

    if is_network_error(error) {
        return ServiceError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ServiceError::Upstream {
        message: format!("{operation} failed: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::map_github_error;
    use crate::error::ServiceError;

    fn github_error(status: StatusCode, message: &str) -> octocrab::GitHubError {
        let mut error: octocrab::GitHubError =
            serde_json::from_value(serde_json::json!({ "message": message }))
                .expect("fixture should deserialise");
        error.status_code = status;
        error
    }

    #[test]
    fn not_found_maps_to_not_found_with_guidance() {
        let error = map_github_error("file content", &github_error(StatusCode::NOT_FOUND, "Not Found"));
        match error {
            ServiceError::NotFound { message } => {
                assert!(message.contains("Check the owner and repository name"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn unauthorized_maps_to_authentication() {
        let error = map_github_error(
            "repo info",
            &github_error(StatusCode::UNAUTHORIZED, "Bad credentials"),
        );
        assert!(
            matches!(error, ServiceError::Authentication { .. }),
            "expected Authentication, got {error:?}"
        );
    }

    #[test]
    fn forbidden_without_rate_limit_maps_to_authentication() {
        let error = map_github_error(
            "repo info",
            &github_error(StatusCode::FORBIDDEN, "Resource not accessible"),
        );
        assert!(
            matches!(error, ServiceError::Authentication { .. }),
            "expected Authentication, got {error:?}"
        );
    }

    #[test]
    fn other_statuses_map_to_upstream_with_status_attached() {
        let error = map_github_error(
            "tree",
            &github_error(StatusCode::BAD_GATEWAY, "upstream flaked"),
        );
        match error {
            ServiceError::Upstream { message } => {
                assert!(message.contains("502"), "missing status in `{message}`");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
