//! Commit listing and detail endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::github::gateway::ListCommitsParams;
use crate::github::locator::CommitSha;
use crate::github::models::{CommitDetail, CommitSummary};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::extract::RepoConnection;

use super::ROUTE_LISTING_LIMIT;

/// Commit listing response.
#[derive(Debug, Serialize)]
pub struct CommitsResponse {
    /// Recent commits, newest first.
    pub commits: Vec<CommitSummary>,
}

/// Commit detail response.
#[derive(Debug, Serialize)]
pub struct CommitResponse {
    /// The requested commit with per-file diff data.
    pub commit: CommitDetail,
}

/// Lists recent commits for the connected repository.
///
/// # Errors
///
/// Returns 401 without a connection header and mapped upstream statuses on
/// gateway failures.
pub async fn list_commits(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
) -> Result<Json<CommitsResponse>, ApiError> {
    let gateway = state.gateway(&connection)?;
    let commits = gateway
        .list_commits(&ListCommitsParams {
            limit: Some(ROUTE_LISTING_LIMIT),
            sha: None,
        })
        .await?;
    Ok(Json(CommitsResponse { commits }))
}

/// Fetches one commit with its diffs.
///
/// # Errors
///
/// Returns 400 for a blank SHA, 401 without a connection header, 404 for an
/// unknown SHA, and mapped upstream statuses otherwise.
pub async fn commit_detail(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Path(sha): Path<String>,
) -> Result<Json<CommitResponse>, ApiError> {
    let selector = CommitSha::new(&sha)?;
    let gateway = state.gateway(&connection)?;
    let commit = gateway.commit(&selector).await?;
    Ok(Json(CommitResponse { commit }))
}
