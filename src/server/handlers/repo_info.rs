//! Dashboard endpoint aggregating repository facts.

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::github::gateway::{
    ListCommitsParams, ListPullRequestsParams, PullRequestState, ResultLimit,
};
use crate::github::models::{CommitSummary, PullRequestSummary, RepoInfo};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::extract::RepoConnection;

const DASHBOARD_LIMIT: ResultLimit = ResultLimit::capped(10);
const ACTIVITY_COMMITS: usize = 5;
const ACTIVITY_PULLS: usize = 3;
const ACTIVITY_CAP: usize = 5;

/// One recent-activity row merged from commits and pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    /// Either `commit` or `pr`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// First line of the commit message, or `PR #n: title`.
    pub message: String,
    /// Author name or login.
    pub author: Option<String>,
    /// Date portion of the event timestamp.
    pub date: Option<String>,
}

/// Aggregated dashboard statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    /// Number of entries in the recursive tree.
    pub total_files: usize,
    /// Number of commits fetched for the dashboard window.
    pub recent_commits: usize,
    /// Open pull requests within the fetched window.
    pub open_prs: usize,
    /// Number of contributors fetched.
    pub contributors: usize,
    /// Merged commit/pull-request activity, newest first.
    pub recent_activity: Vec<ActivityItem>,
}

/// Dashboard response.
#[derive(Debug, Serialize)]
pub struct RepoInfoResponse {
    /// Repository metadata.
    pub repo: RepoInfo,
    /// Aggregated statistics.
    pub stats: RepoStats,
}

/// Aggregates repository metadata, structure, and recent activity.
///
/// The five upstream fetches are independent and run concurrently.
///
/// # Errors
///
/// Returns 401 without a connection header and mapped upstream statuses
/// when any fetch fails.
pub async fn repo_info(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
) -> Result<Json<RepoInfoResponse>, ApiError> {
    let gateway = state.gateway(&connection)?;

    let commits_params = ListCommitsParams {
        limit: Some(DASHBOARD_LIMIT),
        sha: None,
    };
    let pulls_params = ListPullRequestsParams {
        state: Some(PullRequestState::All),
        limit: Some(DASHBOARD_LIMIT),
    };
    let (repo, tree, commits, pulls, contributors) = tokio::try_join!(
        gateway.repo_info(),
        gateway.tree(),
        gateway.list_commits(&commits_params),
        gateway.list_pull_requests(&pulls_params),
        gateway.contributors(DASHBOARD_LIMIT),
    )?;

    let open_prs = pulls
        .iter()
        .filter(|pull| pull.state.as_deref() == Some("open"))
        .count();

    let stats = RepoStats {
        total_files: tree.len(),
        recent_commits: commits.len(),
        open_prs,
        contributors: contributors.len(),
        recent_activity: recent_activity(&commits, &pulls),
    };

    Ok(Json(RepoInfoResponse { repo, stats }))
}

/// Merges the newest commits and pull requests into one feed, newest first.
fn recent_activity(commits: &[CommitSummary], pulls: &[PullRequestSummary]) -> Vec<ActivityItem> {
    let mut items: Vec<(Option<DateTime<FixedOffset>>, ActivityItem)> = Vec::new();

    for commit in commits.iter().take(ACTIVITY_COMMITS) {
        let date = commit.author.date.as_deref();
        items.push((
            parse_timestamp(date),
            ActivityItem {
                kind: "commit",
                message: commit.message.lines().next().unwrap_or_default().to_owned(),
                author: commit.author.name.clone(),
                date: date_portion(date),
            },
        ));
    }

    for pull in pulls.iter().take(ACTIVITY_PULLS) {
        let date = pull.created_at.as_deref();
        items.push((
            parse_timestamp(date),
            ActivityItem {
                kind: "pr",
                message: format!(
                    "PR #{}: {}",
                    pull.number,
                    pull.title.as_deref().unwrap_or("untitled")
                ),
                author: pull.author.login.clone(),
                date: date_portion(date),
            },
        ));
    }

    // Undated items sort to the end rather than panicking on comparison.
    items.sort_by(|left, right| right.0.cmp(&left.0));
    items
        .into_iter()
        .take(ACTIVITY_CAP)
        .map(|(_, item)| item)
        .collect()
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}

fn date_portion(value: Option<&str>) -> Option<String> {
    parse_timestamp(value).map(|timestamp| timestamp.date_naive().to_string())
}

#[cfg(test)]
mod tests {
    use super::recent_activity;
    use crate::github::models::test_support::{commit_summary, pull_request_summary};
    use crate::github::models::{CommitAuthor, CommitSummary};

    #[test]
    fn merges_commits_and_pulls_newest_first_with_cap() {
        let commits: Vec<CommitSummary> = (1..=6).map(commit_summary).collect();
        let pulls = vec![
            pull_request_summary(1, "open"),
            pull_request_summary(2, "closed"),
        ];

        let feed = recent_activity(&commits, &pulls);

        assert_eq!(feed.len(), 5, "feed should cap at five entries");
        let dates: Vec<_> = feed.iter().map(|item| item.date.clone()).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|left, right| right.cmp(left));
        assert_eq!(dates, sorted, "feed should be newest first");
    }

    #[test]
    fn commit_rows_use_first_message_line() {
        let commits = vec![commit_summary(3)];
        let feed = recent_activity(&commits, &[]);

        assert_eq!(
            feed.first().map(|item| item.message.as_str()),
            Some("Commit number 3")
        );
        assert_eq!(feed.first().map(|item| item.kind), Some("commit"));
    }

    #[test]
    fn undated_items_sort_last() {
        let mut undated = commit_summary(1);
        undated.author = CommitAuthor::default();
        let commits = vec![undated, commit_summary(2)];

        let feed = recent_activity(&commits, &[]);
        assert_eq!(feed.last().and_then(|item| item.date.clone()), None);
    }
}
