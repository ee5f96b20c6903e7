//! Connection validation endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ServiceError;
use crate::github::connection::Connection;
use crate::github::models::RepoInfo;
use crate::server::AppState;
use crate::server::error::ApiError;

/// Connection request body.
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    /// Repository owner or organisation.
    pub owner: Option<String>,
    /// Repository name.
    pub repo: Option<String>,
    /// Personal access token.
    pub token: Option<String>,
}

/// Successful connection response: the echoed connection plus repository
/// metadata fetched with it.
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    /// The validated connection for the client to store.
    pub connection: Connection,
    /// Repository metadata proving the connection works.
    pub data: RepoInfo,
}

/// Validates a connection by fetching the repository's metadata with it.
///
/// # Errors
///
/// Returns 400 when owner, repo, or token is missing, 429 on rate limits,
/// and mapped upstream statuses otherwise.
pub async fn connect(
    State(state): State<AppState>,
    Json(request): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let (Some(owner), Some(repo)) = (
        non_blank(request.owner.as_deref()),
        non_blank(request.repo.as_deref()),
    ) else {
        return Err(ApiError::from(ServiceError::Validation {
            message: "Owner and repo are required".to_owned(),
        }));
    };

    let token = non_blank(request.token.as_deref())
        .ok_or_else(|| ApiError::from(ServiceError::MissingToken))?;

    let connection = Connection::new(owner, repo, Some(token))?;
    let gateway = state.gateway(&connection)?;
    let data = gateway.repo_info().await?;

    info!(owner = %connection.owner, repo = %connection.repo, "repository connected");
    Ok(Json(ConnectResponse { connection, data }))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|candidate| !candidate.is_empty())
}
