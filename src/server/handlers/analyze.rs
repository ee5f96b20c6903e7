//! Streaming analysis endpoints.
//!
//! Each handler walks the same states: validate the request, configure a
//! gateway for the connection, fetch the facts (concurrently when they are
//! independent), build the prompt, then relay the model's token stream to
//! the response in arrival order. Nothing is buffered server-side and no
//! state outlives the request.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use tracing::warn;

use crate::ai::TokenStream;
use crate::ai::prompt::{
    commit_analysis_prompt, file_analysis_prompt, pull_request_analysis_prompt,
    repo_analysis_prompt,
};
use crate::error::ServiceError;
use crate::github::gateway::{
    ListCommitsParams, ListPullRequestsParams, PullRequestState, ResultLimit,
};
use crate::github::locator::{CommitSha, PullRequestNumber};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::extract::RepoConnection;

const REPO_ANALYSIS_COMMITS: ResultLimit = ResultLimit::capped(50);
const REPO_ANALYSIS_PULLS: ResultLimit = ResultLimit::capped(20);

/// Body for file analysis requests.
#[derive(Debug, Deserialize)]
pub struct AnalyzeFileRequest {
    /// Path of the file to analyse.
    pub path: Option<String>,
}

/// Body for commit analysis requests.
#[derive(Debug, Deserialize)]
pub struct AnalyzeCommitRequest {
    /// SHA of the commit to analyse.
    pub sha: Option<String>,
}

/// Body for pull request analysis requests.
#[derive(Debug, Deserialize)]
pub struct AnalyzePullRequestRequest {
    /// Number of the pull request to analyse.
    pub number: Option<u64>,
}

/// Converts a token stream into a raw streamed text response.
///
/// Chunks are concatenable into the final answer; there is no envelope. An
/// error after this point terminates the body and is surfaced client-side.
pub(super) fn stream_response(tokens: TokenStream) -> Response {
    let body = Body::from_stream(tokens.map(|chunk| {
        if let Err(error) = &chunk {
            warn!(error = %error, "generation stream failed mid-relay");
        }
        chunk.map(Bytes::from)
    }));
    let mut response = body.into_response();
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Streams an analysis of one file.
///
/// # Errors
///
/// Returns 400 when `path` is missing, 401 without a connection header,
/// and mapped upstream statuses for fetch or stream-open failures.
pub async fn analyze_file(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Json(request): Json<AnalyzeFileRequest>,
) -> Result<Response, ApiError> {
    let path = request
        .path
        .as_deref()
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .ok_or_else(|| ApiError::from(ServiceError::missing_field("path")))?;

    let gateway = state.gateway(&connection)?;
    let file = gateway.file_content(path).await?;
    let prompt = file_analysis_prompt(&file);
    let tokens = state.generator.stream_text(prompt).await?;
    Ok(stream_response(tokens))
}

/// Streams an analysis of one commit.
///
/// # Errors
///
/// Returns 400 when `sha` is missing, 401 without a connection header, and
/// mapped upstream statuses for fetch or stream-open failures.
pub async fn analyze_commit(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Json(request): Json<AnalyzeCommitRequest>,
) -> Result<Response, ApiError> {
    let sha = request
        .sha
        .as_deref()
        .map(CommitSha::new)
        .transpose()?
        .ok_or_else(|| ApiError::from(ServiceError::missing_field("sha")))?;

    let gateway = state.gateway(&connection)?;
    let commit = gateway.commit(&sha).await?;
    let prompt = commit_analysis_prompt(&commit);
    let tokens = state.generator.stream_text(prompt).await?;
    Ok(stream_response(tokens))
}

/// Streams an analysis of one pull request.
///
/// # Errors
///
/// Returns 400 when `number` is missing or zero, 401 without a connection
/// header, and mapped upstream statuses for fetch or stream-open failures.
pub async fn analyze_pull_request(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Json(request): Json<AnalyzePullRequestRequest>,
) -> Result<Response, ApiError> {
    let number = request
        .number
        .map(PullRequestNumber::new)
        .transpose()?
        .ok_or_else(|| ApiError::from(ServiceError::missing_field("number")))?;

    let gateway = state.gateway(&connection)?;
    let pull = gateway.pull_request(number).await?;
    let prompt = pull_request_analysis_prompt(&pull);
    let tokens = state.generator.stream_text(prompt).await?;
    Ok(stream_response(tokens))
}

/// Streams a whole-repository analysis.
///
/// Repository metadata, tree, commits, and pull requests are independent
/// facts and are fetched concurrently before the prompt is built.
///
/// # Errors
///
/// Returns 401 without a connection header and mapped upstream statuses
/// for fetch or stream-open failures.
pub async fn analyze_repo(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
) -> Result<Response, ApiError> {
    let gateway = state.gateway(&connection)?;

    let commits_params = ListCommitsParams {
        limit: Some(REPO_ANALYSIS_COMMITS),
        sha: None,
    };
    let pulls_params = ListPullRequestsParams {
        state: Some(PullRequestState::All),
        limit: Some(REPO_ANALYSIS_PULLS),
    };
    let (info, tree, commits, pulls) = tokio::try_join!(
        gateway.repo_info(),
        gateway.tree(),
        gateway.list_commits(&commits_params),
        gateway.list_pull_requests(&pulls_params),
    )?;

    let prompt = repo_analysis_prompt(&info, &tree, &commits, &pulls);
    let tokens = state.generator.stream_text(prompt).await?;
    Ok(stream_response(tokens))
}
