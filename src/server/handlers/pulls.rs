//! Pull request listing and detail endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::github::gateway::{ListPullRequestsParams, PullRequestState};
use crate::github::locator::PullRequestNumber;
use crate::github::models::{PullRequestDetail, PullRequestSummary};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::extract::RepoConnection;

use super::ROUTE_LISTING_LIMIT;

/// Query parameters for pull request listing.
#[derive(Debug, Default, Deserialize)]
pub struct PullsQuery {
    /// State filter: `open`, `closed`, or `all`. Defaults to `all`.
    pub state: Option<String>,
}

/// Pull request listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullsResponse {
    /// Matching pull requests.
    pub pull_requests: Vec<PullRequestSummary>,
}

/// Pull request detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    /// The requested pull request with its changed files.
    pub pull_request: PullRequestDetail,
}

/// Lists pull requests with an optional state filter.
///
/// The filter is delegated to GitHub via the `state` query parameter; the
/// service does not re-filter locally.
///
/// # Errors
///
/// Returns 400 for an unknown state value, 401 without a connection
/// header, and mapped upstream statuses on gateway failures.
pub async fn list_pull_requests(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Query(query): Query<PullsQuery>,
) -> Result<Json<PullsResponse>, ApiError> {
    let filter = query
        .state
        .as_deref()
        .map(str::parse::<PullRequestState>)
        .transpose()?
        .unwrap_or_default();

    let gateway = state.gateway(&connection)?;
    let pull_requests = gateway
        .list_pull_requests(&ListPullRequestsParams {
            state: Some(filter),
            limit: Some(ROUTE_LISTING_LIMIT),
        })
        .await?;
    Ok(Json(PullsResponse { pull_requests }))
}

/// Fetches one pull request with its changed files.
///
/// # Errors
///
/// Returns 400 for a zero number, 401 without a connection header, 404 for
/// an unknown pull request, and mapped upstream statuses otherwise.
pub async fn pull_request_detail(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Path(number): Path<u64>,
) -> Result<Json<PullResponse>, ApiError> {
    let selector = PullRequestNumber::new(number)?;
    let gateway = state.gateway(&connection)?;
    let pull_request = gateway.pull_request(selector).await?;
    Ok(Json(PullResponse { pull_request }))
}
