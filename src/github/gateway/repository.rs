//! Octocrab-backed implementation of the repository gateway.

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::error::ServiceError;
use crate::github::locator::{CommitSha, PullRequestNumber, RepositoryLocator};
use crate::github::models::{
    ApiCommitDetail, ApiCommitSummary, ApiContents, ApiContributor, ApiFileChange,
    ApiPullRequestDetail, ApiPullRequestSummary, ApiRepo, ApiTree, CommitDetail, CommitSummary,
    Contributor, FileContent, FileEntry, Languages, PullRequestDetail, PullRequestSummary,
    RepoInfo, TreeEntry,
};
use crate::github::rate_limit::RateLimitInfo;

use super::RepositoryGateway;
use super::contents::decode_file_content;
use super::error_mapping::{RATE_LIMIT_GUIDANCE, is_rate_limit_error, map_octocrab_error};
use super::types::{ListCommitsParams, ListPullRequestsParams, ResultLimit};

/// Octocrab-backed gateway bound to one repository connection.
pub struct OctocrabRepositoryGateway {
    client: Octocrab,
    locator: RepositoryLocator,
}

impl OctocrabRepositoryGateway {
    /// Creates a gateway from a configured Octocrab client and locator.
    #[must_use]
    pub const fn new(client: Octocrab, locator: RepositoryLocator) -> Self {
        Self { client, locator }
    }

    /// Maps an octocrab error, enriching rate-limit failures with the
    /// caller's current quota snapshot and token guidance.
    async fn map_error(&self, operation: &str, error: &octocrab::Error) -> ServiceError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                let base_message = format!(
                    "{operation} failed: {message}. {RATE_LIMIT_GUIDANCE}",
                    message = source.message
                );
                let message = match &rate_limit {
                    Some(info) => format!(
                        "{base_message} (resets at {reset})",
                        reset = info.reset_at()
                    ),
                    None => base_message,
                };

                ServiceError::RateLimitExceeded {
                    rate_limit,
                    message,
                }
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }

    async fn fetch<R>(
        &self,
        operation: &str,
        route: String,
        parameters: Option<&Vec<(&str, String)>>,
    ) -> Result<R, ServiceError>
    where
        R: serde::de::DeserializeOwned,
    {
        match self.client.get(route, parameters).await {
            Ok(value) => Ok(value),
            Err(error) => Err(self.map_error(operation, &error).await),
        }
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabRepositoryGateway {
    async fn repo_info(&self) -> Result<RepoInfo, ServiceError> {
        self.fetch::<ApiRepo>("repo info", self.locator.repo_path(), None)
            .await
            .map(ApiRepo::into)
    }

    async fn list_files(&self, path: &str) -> Result<Vec<FileEntry>, ServiceError> {
        let contents: ApiContents = self
            .fetch("list files", self.locator.contents_path(path), None)
            .await?;

        let entries = match contents {
            ApiContents::Listing(entries) => entries,
            ApiContents::Single(entry) => vec![entry],
        };
        Ok(entries.into_iter().map(Into::into).collect())
    }

    async fn file_content(&self, path: &str) -> Result<FileContent, ServiceError> {
        let contents: ApiContents = self
            .fetch("file content", self.locator.contents_path(path), None)
            .await?;

        match contents {
            ApiContents::Listing(_) => Err(ServiceError::Validation {
                message: "path is a directory, not a file".to_owned(),
            }),
            ApiContents::Single(entry) => decode_file_content(entry),
        }
    }

    async fn list_commits(
        &self,
        params: &ListCommitsParams,
    ) -> Result<Vec<CommitSummary>, ServiceError> {
        let limit = params.limit.unwrap_or_default();
        let mut query = vec![("per_page", limit.get().to_string())];
        if let Some(sha) = &params.sha {
            query.push(("sha", sha.as_str().to_owned()));
        }

        let commits: Vec<ApiCommitSummary> = self
            .fetch("list commits", self.locator.commits_path(), Some(&query))
            .await?;
        Ok(commits.into_iter().map(Into::into).collect())
    }

    async fn commit(&self, sha: &CommitSha) -> Result<CommitDetail, ServiceError> {
        self.fetch::<ApiCommitDetail>("commit", self.locator.commit_path(sha), None)
            .await
            .map(ApiCommitDetail::into)
    }

    async fn list_pull_requests(
        &self,
        params: &ListPullRequestsParams,
    ) -> Result<Vec<PullRequestSummary>, ServiceError> {
        let state = params.state.unwrap_or_default();
        let limit = params.limit.unwrap_or_default();
        let query = vec![
            ("state", state.as_str().to_owned()),
            ("per_page", limit.get().to_string()),
        ];

        let pulls: Vec<ApiPullRequestSummary> = self
            .fetch("list pulls", self.locator.pulls_path(), Some(&query))
            .await?;
        Ok(pulls.into_iter().map(Into::into).collect())
    }

    async fn pull_request(
        &self,
        number: PullRequestNumber,
    ) -> Result<PullRequestDetail, ServiceError> {
        // The detail and file list are independent resources; fetch them
        // concurrently and merge so callers never need a second round trip.
        let detail_call = self
            .client
            .get::<ApiPullRequestDetail, _, _>(self.locator.pull_path(number), None::<&()>);
        let files_call = self
            .client
            .get::<Vec<ApiFileChange>, _, _>(self.locator.pull_files_path(number), None::<&()>);

        match tokio::try_join!(detail_call, files_call) {
            Ok((detail, files)) => Ok(detail.into_detail(files)),
            Err(error) => Err(self.map_error("pull request", &error).await),
        }
    }

    async fn tree(&self) -> Result<Vec<TreeEntry>, ServiceError> {
        let query = vec![("recursive", "true".to_owned())];
        let tree: ApiTree = self
            .fetch("tree", self.locator.tree_path(), Some(&query))
            .await?;
        Ok(tree.tree.into_iter().map(Into::into).collect())
    }

    async fn languages(&self) -> Result<Languages, ServiceError> {
        self.fetch("languages", self.locator.languages_path(), None)
            .await
    }

    async fn contributors(&self, limit: ResultLimit) -> Result<Vec<Contributor>, ServiceError> {
        let query = vec![("per_page", limit.get().to_string())];
        let contributors: Vec<ApiContributor> = self
            .fetch(
                "contributors",
                self.locator.contributors_path(),
                Some(&query),
            )
            .await?;
        Ok(contributors.into_iter().map(Into::into).collect())
    }
}
