//! HTTP error envelope for the request boundary.
//!
//! Every failure is converted to a uniform `{"error": "<message>"}` JSON
//! body. For streaming endpoints this applies only before the stream
//! opens; once streaming has begun, an error can no longer be represented
//! in-band and terminates the body instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::ServiceError;

/// A failed request, carrying the mapped status and user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        let status = match &error {
            ServiceError::Validation { .. }
            | ServiceError::MissingToken
            | ServiceError::InvalidUrl(_)
            | ServiceError::InvalidLimit { .. } => StatusCode::BAD_REQUEST,
            ServiceError::MissingConnection
            | ServiceError::InvalidConnection { .. }
            | ServiceError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Upstream { .. }
            | ServiceError::Network { .. }
            | ServiceError::Stream { .. }
            | ServiceError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = Json(serde_json::json!({ "error": self.message })).into_response();
        *response.status_mut() = self.status;
        response
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rstest::rstest;

    use super::ApiError;
    use crate::error::ServiceError;

    #[rstest]
    #[case(ServiceError::missing_field("path"), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::MissingToken, StatusCode::BAD_REQUEST)]
    #[case(ServiceError::MissingConnection, StatusCode::UNAUTHORIZED)]
    #[case(
        ServiceError::Authentication { message: "bad token".to_owned() },
        StatusCode::UNAUTHORIZED
    )]
    #[case(
        ServiceError::NotFound { message: "no such path".to_owned() },
        StatusCode::NOT_FOUND
    )]
    #[case(
        ServiceError::RateLimitExceeded { rate_limit: None, message: "slow down".to_owned() },
        StatusCode::TOO_MANY_REQUESTS
    )]
    #[case(
        ServiceError::Upstream { message: "boom".to_owned() },
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn service_errors_map_to_expected_statuses(
        #[case] error: ServiceError,
        #[case] status: StatusCode,
    ) {
        assert_eq!(ApiError::from(error).status(), status);
    }

    #[test]
    fn missing_connection_message_matches_regression_literal() {
        let error = ApiError::from(ServiceError::MissingConnection);
        assert_eq!(error.message(), "No repository connected");
    }
}
