//! Free-form chat endpoint with keyword-routed context gathering.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use tracing::debug;

use crate::ai::prompt::{ChatContext, ChatTurn, chat_prompt};
use crate::error::ServiceError;
use crate::github::gateway::{
    ListCommitsParams, ListPullRequestsParams, PullRequestState, RepositoryGateway, ResultLimit,
};
use crate::github::models::{CommitSummary, PullRequestSummary, RepoInfo, TreeEntry};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::extract::RepoConnection;

use super::analyze::stream_response;

const CHAT_COMMITS: ResultLimit = ResultLimit::capped(20);
const CHAT_PULLS: ResultLimit = ResultLimit::capped(10);

/// Body for chat requests.
#[derive(Debug, Deserialize)]
pub struct ChatStreamRequest {
    /// The user's message.
    pub message: Option<String>,
    /// Prior conversation turns, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Which context sections a message calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ContextPlan {
    repo_info: bool,
    structure: bool,
    commits: bool,
    pull_requests: bool,
}

/// Decides which facts to gather from keywords in the message.
fn plan_context(message: &str) -> ContextPlan {
    let lowered = message.to_lowercase();
    let about_repo = ["repository", "repo", "about", "project", "what is"]
        .iter()
        .any(|keyword| lowered.contains(keyword));
    let about_files = lowered.contains("file");

    ContextPlan {
        repo_info: about_repo,
        structure: about_repo || about_files,
        commits: lowered.contains("commit"),
        pull_requests: lowered.contains("pull request") || lowered.contains("pr"),
    }
}

async fn maybe_repo_info(
    gateway: &Arc<dyn RepositoryGateway>,
    wanted: bool,
) -> Result<Option<RepoInfo>, ServiceError> {
    if wanted {
        gateway.repo_info().await.map(Some)
    } else {
        Ok(None)
    }
}

async fn maybe_structure(
    gateway: &Arc<dyn RepositoryGateway>,
    wanted: bool,
) -> Result<Option<Vec<TreeEntry>>, ServiceError> {
    if wanted {
        gateway.tree().await.map(Some)
    } else {
        Ok(None)
    }
}

async fn maybe_commits(
    gateway: &Arc<dyn RepositoryGateway>,
    wanted: bool,
) -> Result<Option<Vec<CommitSummary>>, ServiceError> {
    if wanted {
        let params = ListCommitsParams {
            limit: Some(CHAT_COMMITS),
            sha: None,
        };
        gateway.list_commits(&params).await.map(Some)
    } else {
        Ok(None)
    }
}

async fn maybe_pull_requests(
    gateway: &Arc<dyn RepositoryGateway>,
    wanted: bool,
) -> Result<Option<Vec<PullRequestSummary>>, ServiceError> {
    if wanted {
        let params = ListPullRequestsParams {
            state: Some(PullRequestState::All),
            limit: Some(CHAT_PULLS),
        };
        gateway.list_pull_requests(&params).await.map(Some)
    } else {
        Ok(None)
    }
}

/// Streams an answer to a free-form question about the repository.
///
/// Context relevant to the message is fetched concurrently before the
/// prompt is built; sections the message does not call for are skipped.
///
/// # Errors
///
/// Returns 400 when `message` is missing, 401 without a connection header,
/// and mapped upstream statuses for fetch or stream-open failures.
pub async fn chat_stream(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Json(request): Json<ChatStreamRequest>,
) -> Result<Response, ApiError> {
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .ok_or_else(|| ApiError::from(ServiceError::missing_field("message")))?;

    let gateway = state.gateway(&connection)?;
    let plan = plan_context(message);
    debug!(?plan, "gathering chat context");

    let (repo_info, structure, commits, pull_requests) = tokio::try_join!(
        maybe_repo_info(&gateway, plan.repo_info),
        maybe_structure(&gateway, plan.structure),
        maybe_commits(&gateway, plan.commits),
        maybe_pull_requests(&gateway, plan.pull_requests),
    )?;

    let context = ChatContext {
        repo_info,
        structure,
        commits,
        pull_requests,
    };
    let prompt = chat_prompt(message, &context, &request.history);
    let tokens = state.generator.stream_text(prompt).await?;
    Ok(stream_response(tokens))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::plan_context;

    #[rstest]
    #[case("What is this repository about?", true, true, false, false)]
    #[case("Show me the latest commit", false, false, true, false)]
    #[case("Any open pull requests?", false, false, false, true)]
    #[case("Which file defines the parser?", false, true, false, false)]
    #[case("hello", false, false, false, false)]
    fn keywords_route_context_sections(
        #[case] message: &str,
        #[case] repo_info: bool,
        #[case] structure: bool,
        #[case] commits: bool,
        #[case] pull_requests: bool,
    ) {
        let plan = plan_context(message);
        assert_eq!(plan.repo_info, repo_info, "repo_info for `{message}`");
        assert_eq!(plan.structure, structure, "structure for `{message}`");
        assert_eq!(plan.commits, commits, "commits for `{message}`");
        assert_eq!(
            plan.pull_requests, pull_requests,
            "pull_requests for `{message}`"
        );
    }
}
